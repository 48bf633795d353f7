use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::sources::dotenv_file::DotenvFileSource;
use crate::adapters::sources::process::ProcessEnviron;
use crate::core::errors::{EnvError, MissingCause, Result};
use crate::core::models::environment::Environment;
use crate::core::models::field::{Field, FieldDefault};
use crate::core::models::overrides::{Overrides, Values};
use crate::core::models::value::Value;
use crate::core::traits::dotenv_source::{DotenvMap, DotenvSource};
use crate::core::traits::environ::Environ;

/// Default location of the dotenv file, relative to the working directory.
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// The external collaborators an environment is resolved against.
#[derive(Clone)]
pub struct Sources {
    pub dotenv: Arc<dyn DotenvSource>,
    pub environ: Arc<dyn Environ>,
}

impl Sources {
    pub fn new(dotenv: Arc<dyn DotenvSource>, environ: Arc<dyn Environ>) -> Self {
        Self { dotenv, environ }
    }
}

impl Default for Sources {
    /// `.env` files on disk plus the real process environment.
    fn default() -> Self {
        Self {
            dotenv: Arc::new(DotenvFileSource::default()),
            environ: Arc::new(ProcessEnviron),
        }
    }
}

/// Declares an environment and resolves it in one explicit step.
///
/// Source options left unset are inherited from the parent; fields declared
/// here replace parent fields of the same name.
#[derive(Debug)]
pub struct EnvironmentBuilder {
    name: String,
    parent: Option<Arc<Environment>>,
    fields: Vec<(String, Field)>,
    dotenv_path: Option<Option<PathBuf>>,
    use_environ: Option<bool>,
    overrides: Overrides,
}

impl Environment {
    pub fn builder(name: impl Into<String>) -> EnvironmentBuilder {
        EnvironmentBuilder::new(name)
    }
}

impl EnvironmentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            dotenv_path: None,
            use_environ: None,
            overrides: Overrides::default(),
        }
    }

    pub fn parent(mut self, parent: Arc<Environment>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Field)>,
        S: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(name, field)| (name.into(), field)));
        self
    }

    pub fn dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(Some(path.into()));
        self
    }

    /// Disable dotenv lookup; fields must then come from the process
    /// environment or a default.
    pub fn without_dotenv(mut self) -> Self {
        self.dotenv_path = Some(None);
        self
    }

    pub fn use_environ(mut self, enabled: bool) -> Self {
        self.use_environ = Some(enabled);
        self
    }

    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve against `.env` files on disk and the process environment.
    pub fn build(self) -> Result<Arc<Environment>> {
        self.build_with(&Sources::default())
    }

    /// Resolve every field against `sources`.
    ///
    /// Fails on the first field that has no value or does not convert; no
    /// environment is returned in that case.
    pub fn build_with(self, sources: &Sources) -> Result<Arc<Environment>> {
        let parent = self.parent.as_deref();
        let use_environ = self
            .use_environ
            .or(parent.map(|p| p.use_environ))
            .unwrap_or(false);
        let dotenv_path = match self.dotenv_path {
            Some(path) => path,
            None => match parent {
                Some(p) => p.dotenv_path.clone(),
                None => Some(PathBuf::from(DEFAULT_DOTENV_PATH)),
            },
        };

        let mut fields: BTreeMap<String, Field> = parent
            .map(|p| p.fields.clone())
            .unwrap_or_default();
        fields.extend(self.fields);
        fields.extend(self.overrides.fields.clone());

        let mut literals = self.overrides.literals.clone();
        if let Some(hook) = &self.overrides.pre_setup {
            hook(&mut literals);
        }

        let dotenv = match &dotenv_path {
            Some(path) => sources.dotenv.load(&self.name, path)?,
            None => None,
        };

        let resolver = EnvResolver {
            environment: &self.name,
            dotenv: dotenv.as_ref(),
            dotenv_enabled: dotenv_path.is_some(),
            use_environ,
            environ: sources.environ.as_ref(),
        };

        let mut values = Values::new();
        for (attribute, field) in &fields {
            if literals.contains_key(attribute) {
                tracing::debug!(environment = %self.name, field = %attribute, "using literal override");
                continue;
            }
            values.insert(attribute.clone(), resolver.resolve_field(attribute, field)?);
        }
        values.extend(literals);

        if let Some(hook) = &self.overrides.post_setup {
            hook(&mut values).map_err(|detail| EnvError::Setup {
                environment: self.name.clone(),
                detail,
            })?;
        }

        tracing::info!(
            environment = %self.name,
            fields = values.len(),
            dotenv = dotenv.is_some(),
            "environment resolved"
        );

        Ok(Arc::new(Environment {
            name: self.name,
            parent: self.parent,
            dotenv_path,
            use_environ,
            dotenv,
            fields,
            values,
        }))
    }
}

/// Resolves single fields for one environment.
///
/// Precedence: process environment (when enabled), then the dotenv
/// mapping, then the declared default.
pub struct EnvResolver<'a> {
    environment: &'a str,
    dotenv: Option<&'a DotenvMap>,
    dotenv_enabled: bool,
    use_environ: bool,
    environ: &'a dyn Environ,
}

impl EnvResolver<'_> {
    /// Produce the typed value for the field declared as `attribute`.
    ///
    /// # Errors
    ///
    /// - `MissingValue` if no source has the key and there is no default.
    /// - `Conversion` if the raw string (looked up or a string default)
    ///   does not convert.
    pub fn resolve_field(&self, attribute: &str, field: &Field) -> Result<Value> {
        let found = field.key_for(attribute).and_then(|key| self.lookup(key));

        let raw = match found {
            Some((source, raw)) => {
                tracing::debug!(environment = %self.environment, field = %attribute, source, "raw value found");
                raw
            }
            None => match field.default_value() {
                FieldDefault::Raw(raw) => {
                    tracing::debug!(environment = %self.environment, field = %attribute, "using string default");
                    raw.clone()
                }
                FieldDefault::Value(value) => {
                    tracing::debug!(environment = %self.environment, field = %attribute, "using structured default");
                    return Ok(field.converter().publish_default(value.clone()));
                }
                FieldDefault::Undefined => {
                    return Err(EnvError::MissingValue {
                        field: attribute.to_string(),
                        environment: self.environment.to_string(),
                        cause: self.missing_cause(),
                    });
                }
            },
        };

        field
            .converter()
            .convert(&raw)
            .map_err(|e| EnvError::conversion(attribute, self.environment, e))
    }

    fn lookup(&self, key: &str) -> Option<(&'static str, String)> {
        if self.use_environ {
            if let Some(value) = self.environ.var(key) {
                return Some(("environ", value));
            }
        }
        self.dotenv
            .and_then(|map| map.get(key))
            .map(|value| ("dotenv", value.clone()))
    }

    fn missing_cause(&self) -> MissingCause {
        match (self.dotenv_enabled, self.use_environ) {
            (true, _) => MissingCause::NotInDotenv,
            (false, true) => MissingCause::NotInEnviron,
            (false, false) => MissingCause::NoDotenvPath,
        }
    }
}
