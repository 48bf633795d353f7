pub mod env_resolver;
