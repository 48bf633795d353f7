pub mod imports;
pub mod parsers;
pub mod sources;
