use std::path::PathBuf;

use super::config::WorkspaceConfig;
use super::user::MentionableUser;

/// A loaded workspace: config plus the known-users snapshot
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing mention.toml
    pub root: PathBuf,
    pub config: WorkspaceConfig,
    /// Resolved path of the known-users snapshot
    pub users_path: PathBuf,
    pub users: Vec<MentionableUser>,
}

impl Workspace {
    /// Display name: configured name, else the root directory's name
    pub fn name(&self) -> String {
        if let Some(name) = &self.config.workspace.name {
            return name.clone();
        }
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace".to_string())
    }

    pub fn find_user(&self, id: &str) -> Option<&MentionableUser> {
        self.users.iter().find(|u| u.id == id)
    }
}
