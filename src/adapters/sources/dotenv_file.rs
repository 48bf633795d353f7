use std::path::Path;
use std::sync::Arc;

use super::process::ProcessEnviron;
use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::core::errors::Result;
use crate::core::traits::dotenv_source::{DotenvMap, DotenvSource};
use crate::core::traits::environ::Environ;

/// Key naming the environment a `.env` file belongs to.
pub const DEFAULT_SELECTOR_KEY: &str = "ENVIRONMENT";

/// Loads `.env` files from disk.
///
/// A file belongs to the environment named by its own selector entry
/// (`ENVIRONMENT=Production`), or failing that by the process variable of
/// the same name. With neither set, the file applies to every environment.
/// A missing file is an empty mapping.
pub struct DotenvFileSource {
    selector_key: String,
    environ: Arc<dyn Environ>,
}

impl Default for DotenvFileSource {
    fn default() -> Self {
        Self {
            selector_key: DEFAULT_SELECTOR_KEY.to_string(),
            environ: Arc::new(ProcessEnviron),
        }
    }
}

impl DotenvFileSource {
    pub fn new(selector_key: impl Into<String>, environ: Arc<dyn Environ>) -> Self {
        Self {
            selector_key: selector_key.into(),
            environ,
        }
    }

    fn read(&self, path: &Path) -> Result<DotenvMap> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "dotenv file not found, using an empty mapping");
            return Ok(DotenvMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        DotenvParser.parse(&content, path)
    }
}

impl DotenvSource for DotenvFileSource {
    fn load(&self, environment: &str, path: &Path) -> Result<Option<DotenvMap>> {
        let map = self.read(path)?;

        let selected = map
            .get(&self.selector_key)
            .cloned()
            .or_else(|| self.environ.var(&self.selector_key));

        match selected {
            Some(selected) if selected != environment => {
                tracing::debug!(
                    path = %path.display(),
                    environment,
                    selected = %selected,
                    "dotenv file belongs to another environment"
                );
                Ok(None)
            }
            _ => Ok(Some(map)),
        }
    }
}
