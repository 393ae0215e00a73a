use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::WorkspaceConfig;
use crate::model::user::MentionableUser;
use crate::model::workspace::Workspace;

/// Name of the config file that marks a workspace root
pub const CONFIG_FILE: &str = "mention.toml";

/// Error type for workspace I/O operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a mention workspace: no {CONFIG_FILE} found")]
    NotAWorkspace,
    #[error("could not read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {CONFIG_FILE}: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not parse users file {}: {source}", path.display())]
    UsersParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` to the first directory containing mention.toml
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Read and parse mention.toml in `root`
pub fn read_config(root: &Path) -> Result<WorkspaceConfig, WorkspaceError> {
    let path = root.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WorkspaceError::NotAWorkspace,
        _ => WorkspaceError::ReadError {
            path: path.clone(),
            source: e,
        },
    })?;
    Ok(toml::from_str(&text)?)
}

/// Load a known-users snapshot (a JSON array of users).
///
/// A missing file is an empty directory rather than an error: a fresh
/// workspace has nobody to mention yet.
pub fn load_users(path: &Path) -> Result<Vec<MentionableUser>, WorkspaceError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(WorkspaceError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&text).map_err(|e| WorkspaceError::UsersParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a complete workspace rooted at `root`
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let config = read_config(root)?;
    let users_path = root.join(&config.workspace.users);
    let users = load_users(&users_path)?;
    Ok(Workspace {
        root: root.to_path_buf(),
        config,
        users_path,
        users,
    })
}
