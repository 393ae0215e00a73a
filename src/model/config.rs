use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration from mention.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub composer: ComposerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub name: Option<String>,
    /// Known-users snapshot, relative to the workspace root
    #[serde(default = "default_users_file")]
    pub users: String,
}

impl Default for WorkspaceInfo {
    fn default() -> Self {
        WorkspaceInfo {
            name: None,
            users: default_users_file(),
        }
    }
}

fn default_users_file() -> String {
    "users.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Search as soon as a bare `@` is typed, before any query characters
    #[serde(default)]
    pub trigger_on_bare_at: bool,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            trigger_on_bare_at: false,
            max_suggestions: default_max_suggestions(),
            search_timeout_ms: default_search_timeout_ms(),
        }
    }
}

impl ComposerConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

fn default_max_suggestions() -> usize {
    8
}

fn default_search_timeout_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides by theme key (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: WorkspaceConfig = toml::from_str("").unwrap();
        assert_eq!(config.workspace.users, "users.json");
        assert!(config.workspace.name.is_none());
        assert!(!config.composer.trigger_on_bare_at);
        assert_eq!(config.composer.max_suggestions, 8);
        assert_eq!(config.composer.search_timeout(), Duration::from_millis(1500));
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn partial_composer_section() {
        let config: WorkspaceConfig = toml::from_str(
            r##"
[workspace]
name = "Acme"
users = "people/users.json"

[composer]
trigger_on_bare_at = true

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.workspace.name.as_deref(), Some("Acme"));
        assert_eq!(config.workspace.users, "people/users.json");
        assert!(config.composer.trigger_on_bare_at);
        assert_eq!(config.composer.max_suggestions, 8);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
    }
}
