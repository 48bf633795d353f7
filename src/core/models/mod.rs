pub mod descriptors;
pub mod environment;
pub mod field;
pub mod overrides;
pub mod value;
