use serde::{Deserialize, Serialize};

/// The signed-in user, as carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Stable identifier; owns documents and folders.
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

impl AuthenticatedUser {
    /// Short label for headers: the display name, or the email's local part.
    pub fn short_name(&self) -> &str {
        if !self.display_name.trim().is_empty() {
            return &self.display_name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let user = AuthenticatedUser {
            user_id: "demo-demo".to_string(),
            email: "demo@demo.grasp.now".to_string(),
            display_name: "Demo User".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let deserialized: AuthenticatedUser = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, user);
    }

    #[test]
    fn test_short_name_falls_back_to_email() {
        let user = AuthenticatedUser {
            user_id: "u".to_string(),
            email: "reader@example.com".to_string(),
            display_name: " ".to_string(),
        };
        assert_eq!(user.short_name(), "reader");
    }
}
