// Session-scoped key/value storage

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Default location of the file-backed session used by the command line
pub const DEFAULT_SESSION_PATH: &str = "~/.config/casteradm/session.json";

/// Key/value storage scoped to one client session.
///
/// None of the operations fail from the caller's point of view: a value that
/// cannot be read is simply absent, and a write that cannot be persisted is
/// logged and dropped.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// In-memory storage that lives as long as the process holding it.
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.write() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.write() {
            items.remove(key);
        }
    }
}

/// Storage persisted as a flat JSON object, so a session outlives a single
/// command invocation.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Open storage at a path that may start with `~`
    pub fn open(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self::new(PathBuf::from(expanded.as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_items(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn write_items(&self, items: &BTreeMap<String, String>) {
        if items.is_empty() {
            if self.path.exists()
                && let Err(e) = fs::remove_file(&self.path)
            {
                warn!("Failed to remove session file {}: {}", self.path.display(), e);
            }
            return;
        }

        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create session directory {}: {}", parent.display(), e);
            return;
        }

        let content = match serde_json::to_string_pretty(items) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to encode session: {}", e);
                return;
            }
        };

        match write_private(&self.path, &content) {
            Ok(()) => debug!("Session written to {}", self.path.display()),
            Err(e) => warn!("Failed to write session file {}: {}", self.path.display(), e),
        }
    }
}

/// Write `content` to `path`, readable and writable by the owner only
fn write_private(path: &Path, content: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // The mode above only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content.as_bytes())
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.read().ok()?;
        self.read_items().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        let Ok(_guard) = self.lock.write() else {
            return;
        };
        let mut items = self.read_items();
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items);
    }

    fn remove_item(&self, key: &str) {
        let Ok(_guard) = self.lock.write() else {
            return;
        };
        let mut items = self.read_items();
        if items.remove(key).is_some() {
            self.write_items(&items);
        }
    }
}
