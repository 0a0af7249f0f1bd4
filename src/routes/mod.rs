//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 제공합니다.
//! 사용자, 인증, 메시지 샘플링 라우트와 헬스체크 엔드포인트를 포함합니다.
//!
//! # Features
//!
//! - 사용자 CRUD API 엔드포인트
//! - 로컬 인증 API 엔드포인트
//! - Kafka 메시지 샘플링 엔드포인트
//! - 헬스체크 엔드포인트
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::handlers;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// 기능별로 분할된 라우트들을 통합하여 애플리케이션에 등록합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    // Feature-specific routes
    configure_user_routes(cfg);
    configure_auth_routes(cfg);
    configure_message_routes(cfg);
}

/// 사용자 관련 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/v1/users` - 사용자 생성 (회원가입)
/// - `GET /api/v1/users/{id}` - 사용자 조회
/// - `DELETE /api/v1/users/{id}` - 사용자 삭제
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .service(handlers::users::create_user)
            .service(handlers::users::get_user)
            .service(handlers::users::delete_user)
    );
}

/// 인증 관련 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/v1/auth/login` - 이메일/비밀번호 로그인
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::local_login)
    );
}

/// 메시지 샘플링 라우트를 설정합니다
///
/// # Available Routes
///
/// - `GET /api/v1/messages/sample` - 토픽에서 메시지 단건 샘플링
fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .service(handlers::messages::sample_message)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용됩니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "sampler_service_backend",
///   "version": "0.1.0",
///   "timestamp": "2023-01-01T00:00:00Z",
///   "features": {
///     "database": "MongoDB",
///     "cache": "Redis",
///     "messaging": "Kafka",
///     "dependency_injection": "Singleton Macro"
///   }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "sampler_service_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "messaging": "Kafka",
            "dependency_injection": "Singleton Macro"
        }
    }))
}
