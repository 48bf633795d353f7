use std::path::Path;

use crate::cli::output;
use crate::config::schema::Schema;
use crate::core::errors::Result;
use crate::core::services::env_resolver::Sources;

/// Execute the `envclass resolve --env <name>` command.
///
/// Builds the environment and its ancestors from the schema against the
/// process environment and `.env` files, then prints every value.
pub fn execute(schema_path: &Path, env_name: &str, json: bool) -> Result<()> {
    let schema = Schema::load(schema_path)?;
    let environment = schema.build(env_name, &Sources::default())?;

    if json {
        let rendered = serde_json::to_string_pretty(environment.values())?;
        println!("{rendered}");
        return Ok(());
    }

    output::header(&format!("Resolving environment: {env_name}"));
    output::success(&format!(
        "Inheritance chain: {}",
        environment.layers().join(" -> ")
    ));

    match (environment.dotenv_path(), environment.dotenv()) {
        (Some(path), Some(map)) => output::success(&format!(
            "Loaded {} entries from {}",
            map.len(),
            path.display()
        )),
        (Some(path), None) => output::warning(&format!(
            "{} belongs to another environment, not loaded",
            path.display()
        )),
        (None, _) => output::warning("dotenv lookup disabled"),
    }

    println!();
    for (name, value) in environment.values() {
        output::value(name, value);
    }

    output::success(&format!("Resolved {} values", environment.values().len()));
    Ok(())
}
