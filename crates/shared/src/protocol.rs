use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Response of `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of the multipart `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_timestamp: Option<i64>,
    pub photo: String,
}

impl User {
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        self.registration_timestamp
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_url: Option<String>,
}

/// Response of `GET /users?page=<n>&count=<k>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub links: PageLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_listing_page_with_null_next_url() {
        let raw = r#"{
            "success": true,
            "page": 3,
            "total_pages": 3,
            "users": [{
                "id": 30,
                "name": "Olena",
                "email": "olena@example.com",
                "phone": "+380501234567",
                "position": "Designer",
                "position_id": 4,
                "registration_timestamp": 1700000000,
                "photo": "https://example.com/30.jpg"
            }],
            "links": {"next_url": null, "prev_url": "https://example.com/users?page=2&count=6"}
        }"#;

        let page: UsersPage = serde_json::from_str(raw).expect("decode page");
        assert!(page.success);
        assert_eq!(page.links.next_url, None);
        assert_eq!(page.users[0].id, UserId(30));
        assert_eq!(
            page.users[0].registered_at().map(|at| at.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn decodes_failure_bodies_without_payload_fields() {
        let page: UsersPage =
            serde_json::from_str(r#"{"success": false, "message": "Page not found"}"#)
                .expect("decode failure");
        assert!(!page.success);
        assert!(page.users.is_empty());
        assert_eq!(page.links, PageLinks::default());

        let token: TokenResponse =
            serde_json::from_str(r#"{"success": false}"#).expect("decode token failure");
        assert!(token.token.is_none());
    }
}
