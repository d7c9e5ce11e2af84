pub mod aggregation;
pub mod client;
pub mod fixtures;
pub mod models;
