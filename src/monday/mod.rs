pub mod api;
pub mod api_types;
pub mod cache;
pub mod sandbox;
pub mod types;
