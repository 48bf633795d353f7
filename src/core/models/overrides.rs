use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::field::Field;
use super::value::Value;

/// Resolved values of one environment, keyed by attribute name.
pub type Values = BTreeMap<String, Value>;

/// Hook that rewrites literal overrides before resolution.
pub type PreSetupHook = dyn Fn(&mut Values) + Send + Sync;

/// Hook that runs on the resolved values; an `Err` aborts the build.
pub type PostSetupHook = dyn Fn(&mut Values) -> Result<(), String> + Send + Sync;

/// Values and declarations layered over an environment's own fields.
///
/// Literal overrides are published verbatim, bypassing lookup and
/// conversion. Field overrides replace the declaration of the same name.
#[derive(Clone, Default)]
pub struct Overrides {
    pub(crate) literals: Values,
    pub(crate) fields: BTreeMap<String, Field>,
    pub(crate) pre_setup: Option<Arc<PreSetupHook>>,
    pub(crate) post_setup: Option<Arc<PostSetupHook>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.literals.insert(name.into(), value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn pre_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Values) + Send + Sync + 'static,
    {
        self.pre_setup = Some(Arc::new(hook));
        self
    }

    pub fn post_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Values) -> Result<(), String> + Send + Sync + 'static,
    {
        self.post_setup = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("literals", &self.literals.keys().collect::<Vec<_>>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("pre_setup", &self.pre_setup.is_some())
            .field("post_setup", &self.post_setup.is_some())
            .finish()
    }
}
