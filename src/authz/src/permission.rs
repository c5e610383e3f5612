//! Two-segment `resource:action` permissions and wildcard matching

use std::fmt;

/// Segment value that matches any literal in the same position
pub const WILDCARD: &str = "*";

/// Segment separator
pub const SEPARATOR: char = ':';

/// A well-formed permission split into its two segments
///
/// Borrows from the input string; parsing never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission<'a> {
    /// Resource segment (e.g. "orders")
    pub resource: &'a str,

    /// Action segment (e.g. "read")
    pub action: &'a str,
}

impl<'a> Permission<'a> {
    /// Parse a permission string
    ///
    /// Returns `None` unless the input has exactly two colon-delimited
    /// segments. Empty segments are accepted and only ever match themselves
    /// or a wildcard.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut segments = raw.split(SEPARATOR);
        let resource = segments.next()?;
        let action = segments.next()?;
        if segments.next().is_some() {
            return None;
        }

        Some(Self { resource, action })
    }

    /// Whether both segments are wildcards (`*:*`)
    pub fn is_universal(&self) -> bool {
        self.resource == WILDCARD && self.action == WILDCARD
    }

    /// Check whether this permission, held as a claim, satisfies `required`
    ///
    /// Segment-wise: equal, or the claim segment is `*`. A universal claim
    /// satisfies every requirement, including one that does not parse.
    pub fn grants(&self, required: &str) -> bool {
        if self.is_universal() {
            return true;
        }

        match Permission::parse(required) {
            Some(required) => {
                segment_grants(self.resource, required.resource)
                    && segment_grants(self.action, required.action)
            }
            None => false,
        }
    }
}

impl fmt::Display for Permission<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.resource, SEPARATOR, self.action)
    }
}

fn segment_grants(held: &str, required: &str) -> bool {
    held == WILDCARD || held == required
}

/// Check a single raw claim against a required permission
///
/// Malformed claims never match.
pub fn claim_matches(claim: &str, required: &str) -> bool {
    Permission::parse(claim).is_some_and(|held| held.grants(required))
}

/// Check whether any claim satisfies `required`; stops at the first match
pub fn any_claim_matches<'c, I>(claims: I, required: &str) -> bool
where
    I: IntoIterator<Item = &'c str>,
{
    claims.into_iter().any(|claim| claim_matches(claim, required))
}
