pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;

pub use client::{API_PREFIX, AdminClient, merge_params, parse_field};
pub use config::ClientConfig;
pub use endpoint::{Endpoint, Method};
pub use error::ApiError;
