use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    /// Text direction for the language.
    pub fn dir(&self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::He => "rtl",
        }
    }
}

/// Profile document stored at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub preferred_language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(uid: &str, email: &str, display_name: &str) -> Self {
        let display_name = if display_name.trim().is_empty() {
            email.to_string()
        } else {
            display_name.trim().to_string()
        };

        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name,
            preferred_language: Language::En,
            created_at: Some(Utc::now()),
        }
    }
}
