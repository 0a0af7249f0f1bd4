//! # User Management HTTP Handlers
//!
//! 사용자 관리와 관련된 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//! CRUD 작업을 지원하며, RESTful API 설계 원칙을 따릅니다.
//!
//! ## 구현된 엔드포인트
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/users` | 새 사용자 생성 | 201 Created |
//! | `GET` | `/users/{id}` | 사용자 조회 | 200 OK |
//! | `DELETE` | `/users/{id}` | 사용자 삭제 | 204 No Content |

use actix_web::{web, HttpResponse, get, post, delete};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::CreateUserRequest;
use crate::services::users::user_service::UserService;

/// 사용자 생성 핸들러
///
/// 새로운 사용자 계정을 생성합니다.
/// 이메일과 사용자명의 고유성을 검증합니다.
///
/// # 엔드포인트
///
/// `POST /api/v1/users`
///
/// # 요청 본문
///
/// ```json
/// {
///   "email": "user@example.com",
///   "username": "john_doe",
///   "password": "SecurePass123"
/// }
/// ```
///
/// # 응답
///
/// - `201 Created` - 생성된 사용자 정보 (비밀번호 제외)
/// - `400 Bad Request` - 입력 검증 실패
/// - `409 Conflict` - 이메일 또는 사용자명 중복
///
/// # 사용 예제
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/users \
///   -H "Content-Type: application/json" \
///   -d '{"email":"newuser@example.com","username":"newuser","password":"SecurePass123"}'
/// ```
#[post("")]
pub async fn create_user(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    // 유효성 검사
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();
    let response = service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// 사용자 조회 핸들러
///
/// 지정된 ID의 사용자 정보를 조회합니다.
/// 공개 프로필 정보만 반환하며, 비밀번호 해시 등 민감한 정보는 제외됩니다.
///
/// # 엔드포인트
///
/// `GET /api/v1/users/{user_id}`
///
/// # 응답
///
/// - `200 OK` - 사용자 정보
/// - `400 Bad Request` - 잘못된 ObjectId 형식
/// - `404 Not Found` - 사용자 없음
#[get("/{user_id}")]
pub async fn get_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_user_by_id(&user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 사용자 삭제 핸들러
///
/// 지정된 ID의 사용자를 시스템에서 완전히 삭제합니다.
/// 물리적 삭제(Hard Delete)이며, 복구가 불가능합니다.
///
/// # 엔드포인트
///
/// `DELETE /api/v1/users/{user_id}`
///
/// # 응답
///
/// - `204 No Content` - 삭제 성공
/// - `404 Not Found` - 삭제할 사용자 없음
#[delete("/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.delete_user(&user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
