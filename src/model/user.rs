use serde::{Deserialize, Serialize};

/// A workspace member that can be @mentioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionableUser {
    /// Stable identity; the only field guaranteed to be non-empty
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl MentionableUser {
    /// Create a user with only an id set
    pub fn new(id: impl Into<String>) -> Self {
        MentionableUser {
            id: id.into(),
            display_name: None,
            username: None,
            avatar_url: None,
            role: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Display label: display_name, then username, then id (empty values skipped)
    pub fn label(&self) -> &str {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.username.as_deref()))
            .unwrap_or(&self.id)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_display_name() {
        let user = MentionableUser::new("u1")
            .with_display_name("Jane Doe")
            .with_username("jane");
        assert_eq!(user.label(), "Jane Doe");
    }

    #[test]
    fn label_falls_back_to_username_then_id() {
        let user = MentionableUser::new("u1").with_username("jane");
        assert_eq!(user.label(), "jane");
        assert_eq!(MentionableUser::new("u1").label(), "u1");
    }

    #[test]
    fn label_skips_empty_strings() {
        let user = MentionableUser::new("u1")
            .with_display_name("")
            .with_username("jane");
        assert_eq!(user.label(), "jane");
    }

    #[test]
    fn deserialize_minimal_object() {
        let user: MentionableUser = serde_json::from_str(r#"{"id":"u9"}"#).unwrap();
        assert_eq!(user, MentionableUser::new("u9"));
    }

    #[test]
    fn serialize_skips_missing_fields() {
        let user = MentionableUser::new("u1").with_role("admin");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":"u1","role":"admin"}"#);
    }
}
