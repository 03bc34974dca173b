//! Contact form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus { #[default] New, Read, Replied }

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self { Self::New => "new", Self::Read => "read", Self::Replied => "replied" }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            _ => Err(AppError::validation("Status must be one of new, read, replied")),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewContact {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

impl Contact {
    pub fn create(new: NewContact) -> Self {
        let blank_to_none = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            id: Uuid::now_v7(),
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            phone: blank_to_none(new.phone),
            subject: blank_to_none(new.subject),
            message: new.message.trim().to_string(),
            status: ContactStatus::New,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_new() {
        let c = Contact::create(NewContact {
            name: " Omar ".into(),
            email: "omar@example.com".into(),
            phone: Some("  ".into()),
            subject: Some("Sizes".into()),
            message: "Do you have XL?".into(),
        });
        assert_eq!(c.status, ContactStatus::New);
        assert_eq!(c.name, "Omar");
        assert_eq!(c.phone, None);
        assert_eq!(c.subject.as_deref(), Some("Sizes"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ContactStatus::parse("replied").unwrap(), ContactStatus::Replied);
        assert!(ContactStatus::parse("archived").is_err());
    }

    #[test]
    fn test_missing_message_fails_validation() {
        let new = NewContact {
            name: "Omar".into(),
            email: "omar@example.com".into(),
            phone: None,
            subject: None,
            message: String::new(),
        };
        assert!(new.validate().is_err());
    }
}
