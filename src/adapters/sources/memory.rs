//! In-memory sources for tests and embedding.

use std::collections::HashMap;
use std::path::Path;

use crate::core::errors::Result;
use crate::core::traits::dotenv_source::{DotenvMap, DotenvSource};
use crate::core::traits::environ::Environ;

/// Dotenv mappings keyed by environment name.
///
/// Environments without an entry get no mapping at all, the same as a
/// `.env` file selecting a different environment.
#[derive(Debug, Clone, Default)]
pub struct StaticDotenv {
    maps: HashMap<String, DotenvMap>,
}

impl StaticDotenv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping for `environment`. An empty `pairs` still
    /// registers an (empty) mapping.
    pub fn with(mut self, environment: &str, pairs: &[(&str, &str)]) -> Self {
        self.maps.insert(
            environment.to_string(),
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }
}

impl DotenvSource for StaticDotenv {
    fn load(&self, environment: &str, _path: &Path) -> Result<Option<DotenvMap>> {
        Ok(self.maps.get(environment).cloned())
    }
}

/// A fixed set of environment variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnviron {
    vars: HashMap<String, String>,
}

impl MapEnviron {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            vars: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Environ for MapEnviron {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
