use std::path::Path;

use crate::cli::output;
use crate::config::schema::Schema;
use crate::core::errors::{EnvError, Result};
use crate::core::services::env_resolver::Sources;

/// Execute the `envclass check` command.
///
/// Resolves every environment in the schema and reports the ones that
/// fail. Errors if any environment does not resolve.
pub fn execute(schema_path: &Path) -> Result<()> {
    let schema = Schema::load(schema_path)?;
    let sources = Sources::default();

    output::header("envclass check");

    let names = schema.environment_names();
    if names.is_empty() {
        output::warning("No environments declared");
        return Ok(());
    }

    let mut failed = 0;
    for name in &names {
        match schema.build(name, &sources) {
            Ok(environment) => output::success(&format!(
                "{name}: {} values",
                environment.values().len()
            )),
            Err(e) => {
                failed += 1;
                output::error(&format!("{name}: {e}"));
            }
        }
    }

    if failed > 0 {
        return Err(EnvError::CheckFailed { failed });
    }

    println!();
    output::success(&format!("{}/{} environments resolve", names.len(), names.len()));
    Ok(())
}
