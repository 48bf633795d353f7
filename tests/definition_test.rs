use std::sync::Arc;

use envclass::{
    EnvError, Environment, Field, MapEnviron, MissingCause, Overrides, Sources, StaticDotenv,
    Value,
};
use serial_test::serial;

/// Sources with one dotenv mapping registered for `environment`.
fn dotenv(environment: &str, pairs: &[(&str, &str)]) -> Sources {
    Sources::new(
        Arc::new(StaticDotenv::new().with(environment, pairs)),
        Arc::new(MapEnviron::default()),
    )
}

fn string(env: &Environment, name: &str) -> Option<String> {
    env.get(name).and_then(Value::as_str).map(str::to_string)
}

#[test]
fn loads_dotenv_for_matching_environment() {
    let test = Environment::builder("Test")
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(test.dotenv().unwrap()["FOO"], "bar");
}

#[test]
fn skips_dotenv_for_other_environment() {
    let prod = Environment::builder("Prod")
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert!(prod.dotenv().is_none());
}

#[test]
fn subclass_resolves_independently() {
    let common = Environment::builder("Common")
        .field("FOO", Field::string())
        .build_with(&dotenv("Common", &[("FOO", "1")]))
        .unwrap();

    // Field not redeclared, but a different dotenv value
    let test = Environment::builder("Test")
        .parent(common.clone())
        .build_with(&dotenv("Test", &[("FOO", "2")]))
        .unwrap();

    assert_eq!(common.dotenv().unwrap()["FOO"], "1");
    assert_eq!(test.dotenv().unwrap()["FOO"], "2");
    assert_eq!(string(&common, "FOO").as_deref(), Some("1"));
    assert_eq!(string(&test, "FOO").as_deref(), Some("2"));
    assert_eq!(test.layers(), vec!["Common", "Test"]);
}

#[test]
fn subclass_redeclares_field() {
    let common = Environment::builder("Common")
        .field("DEBUG", Field::boolean().default(false))
        .build_with(&dotenv("Common", &[]))
        .unwrap();

    let test = Environment::builder("Test")
        .parent(common.clone())
        .field("DEBUG", Field::boolean().default(true))
        .build_with(&dotenv("Test", &[]))
        .unwrap();

    assert_eq!(common.get("DEBUG"), Some(&Value::Bool(false)));
    assert_eq!(test.get("DEBUG"), Some(&Value::Bool(true)));
}

#[test]
fn missing_value_in_dotenv() {
    let err = Environment::builder("Test")
        .field("FOO", Field::string())
        .build_with(&dotenv("Test", &[("FIZZ", "buzz")]))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Value 'FOO' in environment 'Test' not defined in the .env file and value does not have a default"
    );
}

#[test]
fn missing_value_without_dotenv_path() {
    let err = Environment::builder("Test")
        .without_dotenv()
        .field("FOO", Field::string())
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Value 'FOO' in environment 'Test' needs a default value since environment does not define a `dotenv_path`"
    );
}

#[test]
fn use_environ_reads_process_environment() {
    let sources = Sources::new(
        Arc::new(StaticDotenv::new()),
        Arc::new(MapEnviron::from_pairs(&[("FOO", "bar")])),
    );

    let test = Environment::builder("Test")
        .use_environ(true)
        .field("FOO", Field::string())
        .build_with(&sources)
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("bar"));
}

#[test]
fn environ_takes_precedence_over_dotenv() {
    let sources = Sources::new(
        Arc::new(StaticDotenv::new().with("Test", &[("FOO", "dotenv"), ("BAR", "dotenv")])),
        Arc::new(MapEnviron::from_pairs(&[("FOO", "environ")])),
    );

    let test = Environment::builder("Test")
        .use_environ(true)
        .field("FOO", Field::string())
        .field("BAR", Field::string())
        .build_with(&sources)
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("environ"));
    assert_eq!(string(&test, "BAR").as_deref(), Some("dotenv"));
}

#[test]
fn environ_ignored_unless_enabled() {
    let sources = Sources::new(
        Arc::new(StaticDotenv::new().with("Test", &[])),
        Arc::new(MapEnviron::from_pairs(&[("FOO", "bar")])),
    );

    let err = Environment::builder("Test")
        .field("FOO", Field::string())
        .build_with(&sources)
        .unwrap_err();

    assert!(matches!(
        err,
        EnvError::MissingValue {
            cause: MissingCause::NotInDotenv,
            ..
        }
    ));
}

#[test]
fn overrides_literal_bypasses_lookup() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string())
        .overrides(Overrides::new().literal("FOO", "foo"))
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("foo"));
}

#[test]
fn overrides_literal_satisfies_missing_field() {
    let test = Environment::builder("Test")
        .field("FOO", Field::integer())
        .overrides(Overrides::new().literal("FOO", 3_i64))
        .build_with(&dotenv("Test", &[]))
        .unwrap();

    assert_eq!(test.get("FOO"), Some(&Value::Int(3)));
}

#[test]
fn overrides_field_default_applies() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string())
        .overrides(Overrides::new().field("FOO", Field::string().default("foo")))
        .build_with(&dotenv("Test", &[]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("foo"));
}

#[test]
fn overrides_field_without_default_replaces_declaration() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string().default("bar"))
        .overrides(Overrides::new().field("FOO", Field::string()))
        .build_with(&dotenv("Test", &[("FOO", "foo")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("foo"));
}

#[test]
fn overrides_pre_setup_rewrites_literals() {
    let overrides = Overrides::new().literal("FOO", "foo").pre_setup(|values| {
        values.insert("FOO".to_string(), Value::from("baz"));
    });

    let test = Environment::builder("Test")
        .field("FOO", Field::string())
        .overrides(overrides)
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("baz"));
}

#[test]
fn overrides_post_setup_sees_resolved_values() {
    let overrides = Overrides::new().literal("FOO", "foo").post_setup(|values| {
        values.insert("FOO".to_string(), Value::from("baz"));
        Ok(())
    });

    let test = Environment::builder("Test")
        .field("FOO", Field::string())
        .overrides(overrides)
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("baz"));
}

#[test]
fn post_setup_derives_values() {
    let overrides = Overrides::new().post_setup(|values| {
        let upper = values
            .get("FOO")
            .and_then(Value::as_str)
            .map(str::to_uppercase)
            .ok_or("FOO is not a string")?;
        values.insert("BAR".to_string(), Value::from(upper));
        Ok(())
    });

    let test = Environment::builder("Test")
        .field("FOO", Field::string())
        .overrides(overrides)
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(string(&test, "BAR").as_deref(), Some("BAR"));
}

#[test]
fn post_setup_failure_aborts_build() {
    let overrides = Overrides::new().post_setup(|_| Err("refusing".to_string()));

    let err = Environment::builder("Test")
        .overrides(overrides)
        .build_with(&dotenv("Test", &[]))
        .unwrap_err();

    assert!(matches!(err, EnvError::Setup { .. }));
    assert!(err.to_string().contains("refusing"));
}

#[test]
fn default_used_when_unset() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string().default("fizzbuzz"))
        .build_with(&dotenv("Test", &[]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("fizzbuzz"));
}

#[test]
fn default_null() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string().default_null())
        .build_with(&dotenv("Test", &[]))
        .unwrap();

    assert_eq!(test.get("FOO"), Some(&Value::Null));
}

#[test]
fn env_name_renames_lookup_key() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string().env_name("FIZZ"))
        .build_with(&dotenv("Test", &[("FIZZ", "buzz")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("buzz"));
}

#[test]
fn disabled_env_name_requires_default() {
    let err = Environment::builder("Test")
        .field("FOO", Field::string().without_env_name())
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap_err();

    assert!(matches!(err, EnvError::MissingValue { .. }));
}

#[test]
fn disabled_env_name_uses_default() {
    let test = Environment::builder("Test")
        .field("FOO", Field::string().default("foo").without_env_name())
        .build_with(&dotenv("Test", &[("FOO", "bar")]))
        .unwrap();

    assert_eq!(string(&test, "FOO").as_deref(), Some("foo"));
}

#[test]
#[serial]
fn build_reads_dotenv_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "ENVIRONMENT=Test\nFOO=from-file\n").unwrap();

    temp_env::with_var_unset("ENVIRONMENT", || {
        let test = Environment::builder("Test")
            .dotenv_path(&path)
            .field("FOO", Field::string())
            .build()
            .unwrap();
        assert_eq!(string(&test, "FOO").as_deref(), Some("from-file"));

        let prod = Environment::builder("Prod")
            .dotenv_path(&path)
            .field("FOO", Field::string().default("fallback"))
            .build()
            .unwrap();
        assert_eq!(string(&prod, "FOO").as_deref(), Some("fallback"));
    });
}

#[test]
#[serial]
fn build_reads_process_environment() {
    temp_env::with_var("_ENVCLASS_DEFINITION_FOO", Some("bar"), || {
        let test = Environment::builder("Test")
            .without_dotenv()
            .use_environ(true)
            .field("FOO", Field::string().env_name("_ENVCLASS_DEFINITION_FOO"))
            .build()
            .unwrap();

        assert_eq!(string(&test, "FOO").as_deref(), Some("bar"));
    });
}
