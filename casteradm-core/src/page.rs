use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of admin console pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    Connections,
    Sources,
    Auth,
    Settings,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown page: {0}")]
pub struct PageParseError(pub String);

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Connections,
        Page::Sources,
        Page::Auth,
        Page::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Connections => "connections",
            Page::Sources => "sources",
            Page::Auth => "auth",
            Page::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Connections => "Connections",
            Page::Sources => "Sources",
            Page::Auth => "Auth",
            Page::Settings => "Settings",
        }
    }

    /// Admin API endpoint whose data the page shows by default
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Page::Dashboard => Some("mem"),
            Page::Connections => Some("net"),
            Page::Sources => Some("livesources"),
            Page::Auth => None,
            Page::Settings => Some("sourcetables"),
        }
    }

    /// Exact, case-sensitive lookup
    pub fn parse(value: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.as_str() == value)
    }

    /// Page shown for a URL fragment: the fragment itself when it names a
    /// page, the dashboard for anything else.
    pub fn from_fragment(fragment: &str) -> Page {
        Page::parse(fragment).unwrap_or_default()
    }

    pub fn next(&self) -> Page {
        let idx = Page::ALL.iter().position(|p| p == self).unwrap_or(0);
        Page::ALL[(idx + 1) % Page::ALL.len()]
    }

    pub fn previous(&self) -> Page {
        let idx = Page::ALL.iter().position(|p| p == self).unwrap_or(0);
        Page::ALL[(idx + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Page {
    type Err = PageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::parse(s).ok_or_else(|| PageParseError(s.to_string()))
    }
}
