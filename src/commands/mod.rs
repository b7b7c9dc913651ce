pub mod file;
pub mod migrate;
