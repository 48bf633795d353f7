use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::field::Field;
use super::overrides::Values;
use super::value::Value;
use crate::core::traits::dotenv_source::DotenvMap;

/// A named configuration scope (Test, Staging, Production) with every
/// field already resolved.
///
/// Built through [`EnvironmentBuilder`](crate::EnvironmentBuilder) and
/// immutable afterwards. Children hold their parent by `Arc`; building a
/// child never touches the parent's values.
#[derive(Debug)]
pub struct Environment {
    pub(crate) name: String,
    pub(crate) parent: Option<Arc<Environment>>,
    pub(crate) dotenv_path: Option<PathBuf>,
    pub(crate) use_environ: bool,
    pub(crate) dotenv: Option<DotenvMap>,
    pub(crate) fields: BTreeMap<String, Field>,
    pub(crate) values: Values,
}

impl Environment {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Environment>> {
        self.parent.as_ref()
    }

    /// Names from the root ancestor down to this environment.
    ///
    /// For `Test` deriving from `Common`, returns `["Common", "Test"]`.
    pub fn layers(&self) -> Vec<&str> {
        let mut layers = vec![self.name.as_str()];
        let mut current = self.parent.as_deref();
        while let Some(env) = current {
            layers.push(env.name.as_str());
            current = env.parent.as_deref();
        }
        layers.reverse();
        layers
    }

    /// The dotenv mapping loaded for this environment, if one applied.
    pub fn dotenv(&self) -> Option<&DotenvMap> {
        self.dotenv.as_ref()
    }

    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv_path.as_deref()
    }

    pub fn use_environ(&self) -> bool {
        self.use_environ
    }

    /// Field declarations in effect, inherited ones included.
    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn values(&self) -> &Values {
        &self.values
    }
}
