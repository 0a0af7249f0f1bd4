use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime;
use crate::domain::entities::users::user::User;

/// 사용자 응답 DTO
///
/// 비밀번호 해시 등 민감한 필드를 제외한 공개 가능한 사용자 정보입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            username,
            is_active,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            email,
            username,
            is_active,
            last_login_at,
            created_at,
            updated_at,
        }
    }
}

/// 사용자 생성 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: UserResponse,
    pub message: String,
}

/// 로그인 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub message: String,
}

impl LoginResponse {
    /// 새 로그인 응답 생성
    pub fn new(user: User) -> Self {
        Self {
            user: UserResponse::from(user),
            message: "로그인 성공".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_excludes_password_hash() {
        let user = User::new(
            "user@example.com".to_string(),
            "tester".to_string(),
            "$2b$04$secret".to_string(),
        );

        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(json.contains("user@example.com"));
    }

    #[test]
    fn test_unsaved_user_has_empty_id() {
        let user = User::new(
            "user@example.com".to_string(),
            "tester".to_string(),
            "$2b$04$secret".to_string(),
        );

        let response = UserResponse::from(user);
        assert!(response.id.is_empty());
    }
}
