pub mod converters;
pub mod errors;
pub mod models;
pub mod services;
pub mod traits;
