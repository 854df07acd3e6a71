// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_config, describe_session, format_endpoint_table, format_response, lookup_endpoint,
    open_credentials, parse_fields, read_password, verbosity_level,
};
