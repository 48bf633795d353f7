pub mod dotenv_source;
pub mod environ;
pub mod import_resolver;
