// Admin API calls known to the caster

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One entry of the server's admin call table.
///
/// The server answers 401 for bad or missing credentials, 404 for a path
/// outside this table and 405 when the method does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Net,
    Rtcm,
    Mem,
    Nodes,
    LiveSources,
    SourceTables,
    Reload,
    Drop,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Net,
        Endpoint::Rtcm,
        Endpoint::Mem,
        Endpoint::Nodes,
        Endpoint::LiveSources,
        Endpoint::SourceTables,
        Endpoint::Reload,
        Endpoint::Drop,
    ];

    /// Path segment appended to the API prefix
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Net => "net",
            Endpoint::Rtcm => "rtcm",
            Endpoint::Mem => "mem",
            Endpoint::Nodes => "nodes",
            Endpoint::LiveSources => "livesources",
            Endpoint::SourceTables => "sourcetables",
            Endpoint::Reload => "reload",
            Endpoint::Drop => "drop",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Reload | Endpoint::Drop => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Endpoint::Net => "Active NTRIP connections",
            Endpoint::Rtcm => "RTCM message statistics",
            Endpoint::Mem => "Memory usage statistics",
            Endpoint::Nodes => "Cluster nodes",
            Endpoint::LiveSources => "Live sources",
            Endpoint::SourceTables => "Loaded sourcetables",
            Endpoint::Reload => "Reload the configuration",
            Endpoint::Drop => "Drop a connection (field: id)",
        }
    }

    pub fn lookup(path: &str) -> Option<Endpoint> {
        Endpoint::ALL.into_iter().find(|e| e.path() == path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::lookup(s).ok_or_else(|| format!("Unknown endpoint: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_paths() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::lookup(endpoint.path()), Some(endpoint));
        }
        assert_eq!(Endpoint::lookup("sync"), None);
    }

    #[test]
    fn test_only_reload_and_drop_are_post() {
        let post: Vec<Endpoint> = Endpoint::ALL
            .into_iter()
            .filter(|e| e.method() == Method::Post)
            .collect();
        assert_eq!(post, vec![Endpoint::Reload, Endpoint::Drop]);
    }
}
