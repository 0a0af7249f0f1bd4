//! # 사용자 관리 서비스 구현
//!
//! 사용자 계정의 전체 생명주기를 관리하는 핵심 비즈니스 로직을 구현합니다.
//! 사용자 등록, 인증, 조회, 삭제 등의 핵심 기능을 제공합니다.
//!
//! ## 보안 설계 원칙
//!
//! ### 1. 비밀번호 보안
//!
//! - **bcrypt 해싱**: 적응형 해시 함수로 무차별 대입 공격 방지
//! - **환경별 Cost**: 개발(4) vs 운영(12) 환경별 보안 강도
//! - **솔트 자동 생성**: 레인보우 테이블 공격 방지
//!
//! ### 2. 인증 보안
//!
//! - **계정 상태 검증**: 활성/비활성 계정 확인
//! - **에러 메시지 통합**: 존재하지 않는 이메일과 틀린 비밀번호를 구분하지 않음
//!
//! ### 3. 데이터 보안
//!
//! - **민감 정보 제거**: DTO 변환 시 비밀번호 해시 제외
//! - **중복 방지**: 이메일, 사용자명 유니크 제약

use std::sync::Arc;
use bcrypt::hash;
use singleton_macro::service;
use crate::{
    domain::{
        entities::users::user::User,
        dto::users::{
            request::CreateUserRequest,
            response::{UserResponse, CreateUserResponse},
        },
    },
    repositories::users::user_repo::UserRepository,
    core::errors::AppError,
};
use crate::config::PasswordConfig;

/// 사용자 관리 비즈니스 로직 서비스
///
/// 사용자 계정의 전체 생명주기를 관리하는 핵심 비즈니스 로직을 담당합니다.
/// `#[service]` 매크로를 통해 자동으로 싱글톤으로 관리되며,
/// UserRepository가 자동으로 주입됩니다.
///
/// ```rust,ignore
/// let user_service = UserService::instance(); // 항상 동일한 인스턴스
/// ```
#[service(name = "user")]
pub struct UserService {
    /// 사용자 데이터 액세스 리포지토리 (자동 주입)
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// 새 사용자 계정 생성
    ///
    /// 비밀번호를 bcrypt로 해싱하고 사용자 엔티티를 영구 저장합니다.
    /// 중복 검사는 Repository 레벨에서 수행됩니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(CreateUserResponse)` - 생성된 사용자 정보와 성공 메시지
    /// * `Err(AppError::ConflictError)` - 이메일 또는 사용자명 중복
    /// * `Err(AppError::InternalError)` - 비밀번호 해싱 실패
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<CreateUserResponse, AppError> {
        let start_time = std::time::Instant::now();

        // 환경별 bcrypt cost 사용
        let bcrypt_cost = PasswordConfig::bcrypt_cost();

        // 비밀번호 해싱
        let hash_start = std::time::Instant::now();
        let password_hash = hash(&request.password, bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        let hash_duration = hash_start.elapsed();

        log::info!("Password hashing took: {:?}", hash_duration);

        // 사용자 엔티티 생성
        let user = User::new(
            request.email,
            request.username,
            password_hash,
        );

        // 저장
        let created_user = self.user_repo.create(user).await?;

        let total_duration = start_time.elapsed();
        log::info!("Total user creation took: {:?}", total_duration);

        Ok(CreateUserResponse {
            user: UserResponse::from(created_user),
            message: "사용자가 성공적으로 생성되었습니다".to_string(),
        })
    }

    /// ID로 사용자 조회
    ///
    /// Repository 레이어의 캐싱을 활용하며, 민감 정보를 제거한
    /// DTO 형태로 변환하여 반환합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(UserResponse)` - 사용자 정보 DTO
    /// * `Err(AppError::NotFound)` - 해당 ID의 사용자가 존재하지 않음
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn get_user_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        let user = self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// 이메일 주소로 사용자 조회
    pub async fn get_user_by_email(&self, email: &str) -> Result<UserResponse, AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// 사용자 계정 삭제
    ///
    /// 지정된 ID의 사용자 계정을 시스템에서 영구적으로 삭제합니다.
    /// 되돌릴 수 없는 작업입니다.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.user_repo.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        Ok(())
    }

    /// 로컬 계정 비밀번호 검증
    ///
    /// 이메일과 비밀번호를 사용하여 로그인 인증을 처리합니다.
    /// 성공 시 인증된 사용자 엔티티를 반환합니다.
    ///
    /// # 보안 특징
    ///
    /// 보안을 위해 구체적인 실패 원인을 노출하지 않습니다:
    /// - 존재하지 않는 이메일 → "잘못된 이메일 또는 비밀번호입니다"
    /// - 틀린 비밀번호 → "잘못된 이메일 또는 비밀번호입니다"
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 인증된 사용자 엔티티
    /// * `Err(AppError::AuthenticationError)` - 인증 실패 또는 비활성 계정
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("잘못된 이메일 또는 비밀번호입니다".to_string()))?;

        // 비밀번호 검증
        let verify_start = std::time::Instant::now();
        let is_valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        let verify_duration = verify_start.elapsed();

        log::debug!("Password verification took: {:?}", verify_duration);

        if !is_valid {
            return Err(AppError::AuthenticationError("잘못된 이메일 또는 비밀번호입니다".to_string()));
        }

        if !user.is_active {
            return Err(AppError::AuthenticationError("비활성화된 계정입니다".to_string()));
        }

        let total_duration = start_time.elapsed();
        log::debug!("Total password verification took: {:?}", total_duration);

        Ok(user)
    }

    /// 로그인 성공 시 마지막 로그인 시간을 갱신합니다.
    ///
    /// 갱신 실패는 로그인 자체를 실패시키지 않고 로그만 남깁니다.
    pub async fn record_login(&self, user: &User) -> User {
        let Some(id) = user.id_string() else {
            return user.clone();
        };

        let update_doc = mongodb::bson::doc! {
            "last_login_at": mongodb::bson::DateTime::now(),
            "updated_at": mongodb::bson::DateTime::now(),
        };

        match self.user_repo.update(&id, update_doc).await {
            Ok(Some(updated)) => updated,
            Ok(None) => user.clone(),
            Err(e) => {
                log::warn!("마지막 로그인 시간 갱신 실패: {}", e);
                user.clone()
            }
        }
    }
}
