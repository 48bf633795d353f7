use std::collections::{BTreeMap, BTreeSet};

use crate::core::traits::import_resolver::ImportResolver;

/// Known modules and the names they export.
///
/// `app.handlers.Index` resolves when module `app.handlers` is registered
/// with `Index` among its names; a registered module path resolves on its
/// own as well.
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module<I, S>(mut self, path: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules
            .entry(path.into())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl ImportResolver for ImportRegistry {
    fn resolve(&self, path: &str) -> Result<(), String> {
        let Some((module, name)) = path.rsplit_once('.') else {
            return Err("doesn't look like a module path".to_string());
        };
        if !path.split('.').all(is_identifier) {
            return Err("is not a dotted path of identifiers".to_string());
        }
        if self.modules.contains_key(path) {
            return Ok(());
        }
        let Some(names) = self.modules.get(module) else {
            return Err(format!("no module named '{module}'"));
        };
        if !names.contains(name) {
            return Err(format!("module '{module}' does not define '{name}'"));
        }
        Ok(())
    }
}
