//! Component configuration structs, one module per pipeline collaborator

pub mod database;
pub mod embedding;
pub mod llm;
pub mod retrieval;
pub mod store;
