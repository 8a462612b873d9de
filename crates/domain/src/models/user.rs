//! User domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A person who can be congratulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub username: String,
}

/// Request payload for updating a user (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub username: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::Username;
    use fake::Fake;

    #[test]
    fn test_create_user_request_validation() {
        let ok = CreateUserRequest {
            username: "vjuodz".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateUserRequest {
            username: String::new(),
        };
        assert!(empty.validate().is_err());

        let blank = CreateUserRequest {
            username: "   ".to_string(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_generated_usernames_are_valid() {
        for _ in 0..20 {
            let request = CreateUserRequest {
                username: Username().fake(),
            };
            assert!(request.validate().is_ok(), "{:?}", request.username);
        }
    }

    #[test]
    fn test_update_user_request_empty() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_user_serialization() {
        let user = User {
            id: 3,
            username: "ana".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["username"], "ana");
    }
}
