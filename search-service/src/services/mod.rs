pub mod executor;
pub mod queries;
