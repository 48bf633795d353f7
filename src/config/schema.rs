use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::imports::registry::ImportRegistry;
use crate::core::converters::Converter;
use crate::core::errors::{EnvError, Result};
use crate::core::models::environment::Environment;
use crate::core::models::field::Field;
use crate::core::models::overrides::Overrides;
use crate::core::models::value::Value;
use crate::core::services::env_resolver::{EnvironmentBuilder, Sources};

/// Default schema file name, looked up in the working directory.
pub const DEFAULT_SCHEMA_FILE: &str = "envclass.toml";

/// Environment declarations read from a TOML schema file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    pub environments: BTreeMap<String, EnvEntry>,
    /// Importable modules for `import_string` fields: module → names.
    #[serde(default)]
    pub imports: BTreeMap<String, Vec<String>>,
}

/// One `[environments.<Name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvEntry {
    pub inherits: Option<String>,
    pub dotenv_path: Option<String>,
    /// `false` disables dotenv lookup for this environment.
    pub dotenv: Option<bool>,
    pub use_environ: Option<bool>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldEntry>,
    /// Literal values published verbatim.
    #[serde(default)]
    pub overrides: BTreeMap<String, toml::Value>,
}

/// One `[environments.<Name>.fields.<FIELD>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub kind: String,
    pub env_name: Option<String>,
    /// `false` disables external lookup.
    pub env: Option<bool>,
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub default_null: bool,
    pub child: Option<String>,
    pub regex: Option<String>,
    pub check_exists: Option<bool>,
    pub create_if_missing: Option<bool>,
    pub conn_max_age: Option<u64>,
    pub alias: Option<String>,
}

impl Schema {
    /// Load and validate a schema file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EnvError::InvalidSchema {
                detail: format!("{} not found", path.display()),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse schema text and check that every `inherits` target exists.
    pub fn parse(content: &str) -> Result<Self> {
        let schema: Self = toml::from_str(content).map_err(|e| EnvError::InvalidSchema {
            detail: format!("failed to parse schema: {e}"),
        })?;

        for (name, entry) in &schema.environments {
            if let Some(parent) = &entry.inherits {
                if !schema.environments.contains_key(parent) {
                    return Err(EnvError::InvalidSchema {
                        detail: format!("environment '{name}' inherits unknown environment '{parent}'"),
                    });
                }
            }
        }

        Ok(schema)
    }

    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }

    /// Environment names from the root ancestor down to `name`.
    ///
    /// `Test` with `inherits = "Common"` gives `["Common", "Test"]`.
    pub fn build_chain(&self, name: &str) -> Result<Vec<String>> {
        // Leaf first while following `inherits` links.
        let mut lineage: Vec<&str> = Vec::new();
        let mut next = Some(name);

        while let Some(env_name) = next {
            if let Some(start) = lineage.iter().position(|seen| *seen == env_name) {
                let mut cycle = lineage[start..].to_vec();
                cycle.push(env_name);
                return Err(EnvError::CircularInheritance {
                    chain: cycle.join(" -> "),
                });
            }

            let entry = self
                .environments
                .get(env_name)
                .ok_or_else(|| EnvError::EnvironmentNotFound {
                    name: env_name.to_string(),
                    available: self.environment_names().join(", "),
                })?;

            lineage.push(env_name);
            next = entry.inherits.as_deref();
        }

        Ok(lineage.into_iter().rev().map(str::to_string).collect())
    }

    /// Build `name` and all of its ancestors against `sources`.
    pub fn build(&self, name: &str, sources: &Sources) -> Result<Arc<Environment>> {
        let chain = self.build_chain(name)?;
        let registry = Arc::new(self.import_registry());

        let mut parent: Option<Arc<Environment>> = None;
        for layer in &chain {
            let entry = &self.environments[layer];
            let mut builder = self.builder_for(layer, entry, &registry)?;
            if let Some(parent) = parent.take() {
                builder = builder.parent(parent);
            }
            parent = Some(builder.build_with(sources)?);
        }

        parent.ok_or_else(|| EnvError::EnvironmentNotFound {
            name: name.to_string(),
            available: self.environment_names().join(", "),
        })
    }

    fn import_registry(&self) -> ImportRegistry {
        self.imports
            .iter()
            .fold(ImportRegistry::new(), |registry, (module, names)| {
                registry.module(module.clone(), names.iter().cloned())
            })
    }

    fn builder_for(
        &self,
        name: &str,
        entry: &EnvEntry,
        registry: &Arc<ImportRegistry>,
    ) -> Result<EnvironmentBuilder> {
        let mut builder = Environment::builder(name);

        if entry.dotenv == Some(false) {
            builder = builder.without_dotenv();
        } else if let Some(path) = &entry.dotenv_path {
            builder = builder.dotenv_path(path);
        }
        if let Some(enabled) = entry.use_environ {
            builder = builder.use_environ(enabled);
        }

        for (field_name, field_entry) in &entry.fields {
            let field = field_entry.to_field(registry).map_err(|detail| EnvError::InvalidSchema {
                detail: format!("field '{field_name}' in environment '{name}': {detail}"),
            })?;
            builder = builder.field(field_name.clone(), field);
        }

        if !entry.overrides.is_empty() {
            let overrides = entry
                .overrides
                .iter()
                .fold(Overrides::new(), |overrides, (key, value)| {
                    overrides.literal(key.clone(), toml_to_value(value))
                });
            builder = builder.overrides(overrides);
        }

        Ok(builder)
    }
}

impl FieldEntry {
    fn to_field(&self, registry: &Arc<ImportRegistry>) -> std::result::Result<Field, String> {
        let converter = converter_for(&self.kind, registry)?;
        let mut field = match &self.child {
            Some(child) => {
                let child = converter_for(child, registry)?;
                match converter {
                    Converter::List(_) => Field::list_of(child),
                    Converter::Tuple(_) => Field::tuple_of(child),
                    Converter::Set(_) => Field::set_of(child),
                    Converter::Dict(_) => Field::dict_of(child),
                    _ => return Err(format!("kind '{}' does not take a child", self.kind)),
                }
            }
            None => match converter {
                Converter::Regex(_) => {
                    let pattern = self
                        .regex
                        .as_deref()
                        .ok_or("kind 'regex' requires a `regex` pattern")?;
                    Field::regex(pattern)
                }
                Converter::DatabaseUrl { .. } => Field::database_url(),
                Converter::CacheUrl { .. } => Field::cache_url(),
                other => Field::new(other),
            },
        };

        if let Some(check) = self.check_exists {
            field = field.check_exists(check);
        }
        if let Some(create) = self.create_if_missing {
            field = field.create_if_missing(create);
        }
        if let Some(seconds) = self.conn_max_age {
            field = field.conn_max_age(seconds);
        }
        if let Some(alias) = &self.alias {
            field = field.alias(alias.clone());
        }
        if self.env == Some(false) {
            field = field.without_env_name();
        } else if let Some(env_name) = &self.env_name {
            field = field.env_name(env_name.clone());
        }
        if self.default_null {
            field = field.default_null();
        } else if let Some(default) = &self.default {
            field = field.default(toml_to_value(default));
        }

        Ok(field)
    }
}

/// Converter for a schema `kind`, with no options applied yet.
fn converter_for(kind: &str, registry: &Arc<ImportRegistry>) -> std::result::Result<Converter, String> {
    let converter = match kind {
        "string" => Converter::String,
        "boolean" => Converter::Boolean,
        "integer" => Converter::Integer,
        "positive_integer" => Converter::PositiveInteger,
        "float" => Converter::Float,
        "decimal" => Converter::Decimal,
        "import_string" => Converter::ImportString(registry.clone()),
        "list" => Converter::List(None),
        "tuple" => Converter::Tuple(None),
        "set" => Converter::Set(None),
        "dict" => Converter::Dict(None),
        "json" => Converter::Json,
        "email" => Converter::Email,
        "url" => Converter::Url,
        "ip" => Converter::Ip,
        "regex" => Converter::Regex(String::new()),
        "path" => Converter::Path {
            check_exists: true,
            create_if_missing: false,
        },
        "database_url" => Converter::DatabaseUrl {
            conn_max_age: 0,
            alias: String::new(),
        },
        "cache_url" => Converter::CacheUrl {
            alias: String::new(),
        },
        other => {
            return Err(format!(
                "unknown kind '{other}' (expected one of: {})",
                KINDS.join(", ")
            ));
        }
    };
    Ok(converter)
}

const KINDS: [&str; 19] = [
    "string",
    "boolean",
    "integer",
    "positive_integer",
    "float",
    "decimal",
    "import_string",
    "list",
    "tuple",
    "set",
    "dict",
    "json",
    "email",
    "url",
    "ip",
    "regex",
    "path",
    "database_url",
    "cache_url",
];

/// TOML strings stay raw (and get converted); everything else is a
/// structured value.
fn toml_to_value(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Dict(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sources::memory::{MapEnviron, StaticDotenv};

    const SCHEMA: &str = r#"
        [imports]
        "app.handlers" = ["Index"]

        [environments.Common]
        use_environ = false

        [environments.Common.fields.DEBUG]
        kind = "boolean"
        default = false

        [environments.Common.fields.PORT]
        kind = "integer"
        default = "8_000"

        [environments.Common.fields.HOSTS]
        kind = "list"
        child = "ip"
        default = []

        [environments.Common.fields.HANDLER]
        kind = "import_string"
        default = "app.handlers.Index"

        [environments.Production]
        inherits = "Common"

        [environments.Production.overrides]
        DEBUG = false
    "#;

    fn sources(pairs: &[(&str, &str, &str)]) -> Sources {
        let mut dotenv = StaticDotenv::new();
        for (env, key, value) in pairs {
            dotenv = dotenv.with(env, &[(*key, *value)]);
        }
        Sources::new(Arc::new(dotenv), Arc::new(MapEnviron::default()))
    }

    #[test]
    fn parse_and_build_chain() {
        let schema = Schema::parse(SCHEMA).unwrap();

        assert_eq!(schema.environment_names(), vec!["Common", "Production"]);
        assert_eq!(
            schema.build_chain("Production").unwrap(),
            vec!["Common", "Production"]
        );
    }

    #[test]
    fn build_resolves_defaults_and_dotenv() {
        let schema = Schema::parse(SCHEMA).unwrap();

        let env = schema
            .build("Production", &sources(&[("Production", "PORT", "9000")]))
            .unwrap();

        assert_eq!(env.get("PORT"), Some(&Value::Int(9000)));
        assert_eq!(env.get("DEBUG"), Some(&Value::Bool(false)));
        assert_eq!(env.get("HOSTS"), Some(&Value::List(vec![])));
        assert_eq!(env.get("HANDLER"), Some(&Value::from("app.handlers.Index")));
        assert_eq!(env.layers(), vec!["Common", "Production"]);
    }

    #[test]
    fn string_default_is_converted() {
        let schema = Schema::parse(SCHEMA).unwrap();

        let env = schema.build("Common", &sources(&[])).unwrap();

        assert_eq!(env.get("PORT"), Some(&Value::Int(8000)));
    }

    #[test]
    fn circular_inheritance_detected() {
        let schema = Schema::parse(
            r#"
            [environments.A]
            inherits = "B"
            [environments.B]
            inherits = "A"
            "#,
        )
        .unwrap();

        let err = schema.build_chain("A").unwrap_err().to_string();
        assert!(err.contains("inheritance loops back"));
        assert!(err.contains("A -> B -> A"));
    }

    #[test]
    fn cycle_above_the_leaf_is_reported_alone() {
        let schema = Schema::parse(
            r#"
            [environments.Leaf]
            inherits = "A"
            [environments.A]
            inherits = "B"
            [environments.B]
            inherits = "A"
            "#,
        )
        .unwrap();

        let err = schema.build_chain("Leaf").unwrap_err();
        assert!(matches!(&err, EnvError::CircularInheritance { chain } if chain == "A -> B -> A"));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = Schema::parse(
            r#"
            [environments.Test]
            inherits = "missing_base"
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("missing_base"));
    }

    #[test]
    fn unknown_environment_lists_available() {
        let schema = Schema::parse(SCHEMA).unwrap();

        let err = schema.build_chain("Staging").unwrap_err().to_string();
        assert!(err.contains("Staging"));
        assert!(err.contains("Common, Production"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let schema = Schema::parse(
            r#"
            [environments.Test.fields.FOO]
            kind = "uuid"
            "#,
        )
        .unwrap();

        let err = schema.build("Test", &sources(&[])).unwrap_err().to_string();
        assert!(err.contains("unknown kind 'uuid'"));
    }

    #[test]
    fn regex_kind_requires_pattern() {
        let schema = Schema::parse(
            r#"
            [environments.Test.fields.CODE]
            kind = "regex"
            "#,
        )
        .unwrap();

        assert!(schema.build("Test", &sources(&[])).is_err());
    }

    #[test]
    fn table_defaults_are_keyed_by_alias() {
        let schema = Schema::parse(
            r#"
            [environments.Test.fields.DATABASES]
            kind = "database_url"
            [environments.Test.fields.DATABASES.default]
            ENGINE = "django.db.backends.postgresql"
            NAME = "dbname"
            PORT = 8000

            [environments.Test.fields.CACHES]
            kind = "cache_url"
            alias = "sessions"
            [environments.Test.fields.CACHES.default]
            BACKEND = "django.core.cache.backends.redis.RedisCache"
            LOCATION = "redis://master:6379/0"
            "#,
        )
        .unwrap();

        let env = schema.build("Test", &sources(&[])).unwrap();

        assert_eq!(
            env.get("DATABASES").unwrap().to_json(),
            serde_json::json!({
                "default": {
                    "ENGINE": "django.db.backends.postgresql",
                    "NAME": "dbname",
                    "PORT": 8000,
                }
            })
        );
        assert_eq!(
            env.get("CACHES").unwrap().to_json(),
            serde_json::json!({
                "sessions": {
                    "BACKEND": "django.core.cache.backends.redis.RedisCache",
                    "LOCATION": "redis://master:6379/0",
                }
            })
        );
    }

    #[test]
    fn disabled_dotenv_and_null_default() {
        let schema = Schema::parse(
            r#"
            [environments.Test]
            dotenv = false
            [environments.Test.fields.TOKEN]
            kind = "string"
            default_null = true
            [environments.Test.fields.DATABASES]
            kind = "database_url"
            alias = "primary"
            default = "postgres://u:p@db:5432/app"
            "#,
        )
        .unwrap();

        let env = schema.build("Test", &sources(&[("Test", "TOKEN", "x")])).unwrap();

        assert_eq!(env.get("TOKEN"), Some(&Value::Null));
        assert!(env.dotenv().is_none());
        let databases = env.get("DATABASES").and_then(Value::as_databases).unwrap();
        assert_eq!(databases["primary"].port, Some(5432));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Schema::parse(
            r#"
            [environments.Test]
            dotenv_file = ".env"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, EnvError::InvalidSchema { .. }));
    }
}
