//! # Authentication HTTP Handlers
//!
//! 로컬 계정 인증 엔드포인트를 처리하는 핸들러 함수들입니다.

use actix_web::{web, HttpResponse, post};
use log::info;
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::LocalLoginRequest;
use crate::domain::dto::users::response::LoginResponse;
use crate::services::users::user_service::UserService;

/// 로컬 로그인 핸들러
///
/// 이메일과 비밀번호로 사용자를 인증하고, 성공 시 사용자 정보를 반환합니다.
/// 로그인 성공 시 마지막 로그인 시간이 갱신됩니다.
///
/// # 엔드포인트
///
/// `POST /api/v1/auth/login`
///
/// # 요청 본문
///
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "SecurePass123"
/// }
/// ```
///
/// # 응답
///
/// - `200 OK` - 인증 성공, 사용자 정보 반환
/// - `400 Bad Request` - 입력 검증 실패
/// - `401 Unauthorized` - 잘못된 자격 증명 또는 비활성 계정
///
/// # 보안
///
/// 존재하지 않는 이메일과 틀린 비밀번호에 대해 동일한 에러 메시지를
/// 반환하여 계정 존재 여부를 노출하지 않습니다.
///
/// # 사용 예제
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"SecurePass123"}'
/// ```
#[post("/login")]
pub async fn local_login(
    payload: web::Json<LocalLoginRequest>,
) -> Result<HttpResponse, AppError> {
    // 유효성 검사
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();

    // 비밀번호 검증
    let user = service.verify_password(&payload.email, &payload.password).await?;

    info!("로그인 성공: {}", user.username);

    // 마지막 로그인 시간 갱신 (실패해도 로그인은 성공)
    let user = service.record_login(&user).await;

    Ok(HttpResponse::Ok().json(LoginResponse::new(user)))
}
