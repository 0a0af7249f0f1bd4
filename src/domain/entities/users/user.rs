//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 이메일/비밀번호 기반 로컬 계정 모델을 제공합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 비밀번호는 bcrypt 해시 형태로만 저장됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 사용자명 (unique)
    pub username: String,
    /// bcrypt로 해시된 비밀번호
    pub password_hash: String,
    /// 계정 활성화 여부
    pub is_active: bool,
    /// 마지막 로그인 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자 생성 (이메일/패스워드)
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            username,
            password_hash,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
