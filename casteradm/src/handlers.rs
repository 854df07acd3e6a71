use casteradm_client::{ClientConfig, Endpoint, parse_field};
use casteradm_core::{CredentialStore, Credentials, FileStorage};
use colored::Colorize;
use serde_json::Value;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// Helper functions for the command handlers

/// Credentials persisted in the session file at `path` (`~` is expanded)
pub fn open_credentials(path: &str) -> CredentialStore {
    CredentialStore::new(Arc::new(FileStorage::open(path)))
}

/// A fresh in-memory session, as used by the console
pub fn memory_credentials() -> CredentialStore {
    CredentialStore::new(Arc::new(casteradm_core::MemoryStorage::new()))
}

pub fn build_config(server: &str, timeout_secs: Option<u64>) -> ClientConfig {
    let config = ClientConfig::new(server.trim_end_matches('/'));
    match timeout_secs {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    }
}

/// Log level for the number of `-v` flags given
pub fn verbosity_level(count: u8) -> Level {
    match count {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Read a password from the first line of `reader`, without the line ending
pub fn read_password<R: BufRead>(mut reader: R) -> Result<String, String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read password from stdin: {}", e))?;
    if read == 0 {
        return Err("No password given, use --password or pipe it on stdin".to_string());
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Parse `key=value` arguments into form fields
pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Result<Vec<(String, String)>, String> {
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            parse_field(field).ok_or_else(|| format!("Invalid field '{}', expected key=value", field))
        })
        .collect()
}

/// Catalogue entry for an endpoint name, if the server is known to have one
pub fn lookup_endpoint(name: &str) -> Option<Endpoint> {
    Endpoint::lookup(name.trim_matches('/'))
}

pub fn format_response(value: &Value, raw: bool) -> String {
    if raw {
        return value.to_string();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn format_endpoint_table() -> String {
    let mut table = String::new();
    table.push_str(&format!(
        "{:<6} {:<14} {}\n",
        "METHOD".bold(),
        "ENDPOINT".bold(),
        "DESCRIPTION".bold()
    ));
    for endpoint in Endpoint::ALL {
        table.push_str(&format!(
            "{:<6} {:<14} {}\n",
            endpoint.method().to_string().cyan(),
            endpoint.path(),
            endpoint.description()
        ));
    }
    table
}

pub fn describe_session(credentials: &Credentials) -> String {
    match credentials.user.as_deref() {
        Some(user) if !user.is_empty() => format!("Logged in as {}", user),
        _ => "Not logged in".to_string(),
    }
}
