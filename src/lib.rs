pub mod alias;
pub mod config;
pub mod eth;
pub mod ext;
pub mod infra;
