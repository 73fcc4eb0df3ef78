//! CLI command implementations

pub mod cep;
pub mod tables;
pub mod validate;
