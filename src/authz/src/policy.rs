//! Policy table: static route -> method -> required permission mapping
//!
//! Built once from configuration (JSON document or builder) and read-only
//! afterwards. Route keys are exact strings, no pattern matching.

use crate::error::{AuthzError, Result};
use crate::permission::Permission;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Raw on-disk shape: `{ "/route": { "GET": "resource:action" } }`
type RawTable = HashMap<String, HashMap<String, String>>;

/// Required permission per HTTP method for a single route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodMap {
    methods: HashMap<String, String>,
}

impl MethodMap {
    /// Required permission for `method`, if the method is registered
    ///
    /// Method names are exact keys: `get` and `GET` are different methods.
    pub fn lookup_method(&self, method: &str) -> Option<&str> {
        self.methods.get(method).map(String::as_str)
    }

    /// Registered `(method, required permission)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.methods.iter().map(|(m, p)| (m.as_str(), p.as_str()))
    }

    /// Number of registered methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when no methods are registered
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Immutable route permission table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct PolicyTable {
    routes: HashMap<String, MethodMap>,
}

impl PolicyTable {
    /// Start building a table programmatically
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::new()
    }

    /// Parse a JSON policy document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON policy document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents)?;

        debug!(
            "Loaded policy table from {}: {} routes",
            path.display(),
            table.len()
        );

        Ok(table)
    }

    /// Method map for `route`, if the route is a registered key
    pub fn lookup_route(&self, route: &str) -> Option<&MethodMap> {
        self.routes.get(route)
    }

    /// Registered routes with their method maps
    pub fn routes(&self) -> impl Iterator<Item = (&str, &MethodMap)> {
        self.routes.iter().map(|(r, m)| (r.as_str(), m))
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl TryFrom<RawTable> for PolicyTable {
    type Error = AuthzError;

    fn try_from(raw: RawTable) -> Result<Self> {
        let mut builder = PolicyTableBuilder::new();
        for (route, methods) in raw {
            builder = builder.declare_route(route.clone());
            for (method, required) in methods {
                builder = builder.route(route.clone(), method, required);
            }
        }
        builder.build()
    }
}

/// Builder for [`PolicyTable`]
///
/// Validation happens in [`PolicyTableBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct PolicyTableBuilder {
    declared: Vec<String>,
    entries: Vec<(String, String, String)>,
}

impl PolicyTableBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route` without any methods
    ///
    /// Every method on a declared route is rejected as undefined.
    pub fn declare_route(mut self, route: impl Into<String>) -> Self {
        self.declared.push(route.into());
        self
    }

    /// Require `permission` for `method` on `route`
    pub fn route(
        mut self,
        route: impl Into<String>,
        method: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.entries
            .push((route.into(), method.into(), permission.into()));
        self
    }

    /// Validate entries and freeze the table
    ///
    /// Rejects empty routes, empty methods and duplicate `(route, method)`
    /// pairs. Method names are kept exactly as written. Malformed permissions are
    /// accepted with a warning since only `*:*` can satisfy them.
    pub fn build(self) -> Result<PolicyTable> {
        let mut routes: HashMap<String, MethodMap> = HashMap::new();

        for route in self.declared {
            validate_route(&route)?;
            routes.entry(route).or_default();
        }

        for (route, method, required) in self.entries {
            validate_route(&route)?;

            if method.trim().is_empty() {
                return Err(AuthzError::InvalidPolicy(format!(
                    "Route '{}' has an empty method name",
                    route
                )));
            }

            if Permission::parse(&required).is_none() {
                warn!(
                    route = %route,
                    method = %method,
                    permission = %required,
                    "Malformed required permission; only '*:*' can satisfy it"
                );
            }

            let entry = routes.entry(route.clone()).or_default();
            if entry.methods.contains_key(&method) {
                return Err(AuthzError::InvalidPolicy(format!(
                    "Duplicate permission for route '{}' method '{}'",
                    route, method
                )));
            }
            entry.methods.insert(method, required);
        }

        Ok(PolicyTable { routes })
    }
}

fn validate_route(route: &str) -> Result<()> {
    if route.is_empty() {
        return Err(AuthzError::InvalidPolicy(
            "Route key cannot be empty".to_string(),
        ));
    }
    Ok(())
}
