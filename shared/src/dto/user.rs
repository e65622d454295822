use serde::{Deserialize, Serialize};

/// Email notification preferences stored on the user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Send an email when a joined club publishes a new post
    pub new_post_email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            new_post_email: true,
        }
    }
}

/// The `users/{uid}` profile document.
///
/// Created exactly once per identifier, at first sign-up, with all four
/// membership lists empty. The lists are mutated afterwards by membership
/// and officer actions, never by profile creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub notification_preferences: NotificationPreferences,
    #[serde(default)]
    pub joined_clubs: Vec<String>,
    #[serde(default)]
    pub liked_content: Vec<String>,
    #[serde(default)]
    pub events_attend: Vec<String>,
    #[serde(default)]
    pub is_officer_of: Vec<String>,
}

impl UserProfile {
    /// Build the initial profile written at first sign-up.
    pub fn new_account(
        user_id: impl Into<String>,
        email: impl Into<String>,
        display_name: Option<String>,
        notify_on_new_post: bool,
    ) -> Self {
        let email = email.into();
        // The original signup form treats the address local part as the
        // fallback name when none was typed.
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            user_id: user_id.into(),
            name,
            email,
            display_name,
            notification_preferences: NotificationPreferences {
                new_post_email: notify_on_new_post,
            },
            joined_clubs: Vec::new(),
            liked_content: Vec::new(),
            events_attend: Vec::new(),
            is_officer_of: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_empty_lists() {
        let profile = UserProfile::new_account("uid-1", "slug@ucsc.edu", None, true);

        assert!(profile.joined_clubs.is_empty());
        assert!(profile.liked_content.is_empty());
        assert!(profile.events_attend.is_empty());
        assert!(profile.is_officer_of.is_empty());
        assert_eq!(profile.name, "slug");
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = UserProfile::new_account("uid-1", "slug@ucsc.edu", None, false);
        let json = serde_json::to_value(&profile).unwrap();

        assert!(json.get("joinedClubs").is_some());
        assert!(json.get("notificationPreferences").is_some());
        assert_eq!(json["notificationPreferences"]["newPostEmail"], false);
    }

    #[test]
    fn test_profile_deserializes_missing_lists_as_empty() {
        let json = r#"{
            "userId": "uid-2",
            "name": "slug",
            "email": "slug@ucsc.edu",
            "notificationPreferences": { "newPostEmail": true }
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert!(profile.joined_clubs.is_empty());
        assert!(profile.is_officer_of.is_empty());
    }
}
