//! # Core Framework Module
//!
//! 백엔드 서비스를 위한 핵심 프레임워크 기능을 제공하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 전역 싱글톤 컨테이너
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 서비스 등록
//! - **싱글톤 관리**: Thread-safe한 인스턴스 생명주기 관리
//! - **의존성 해결**: `Arc<T>` 타입 기반 자동 의존성 주입
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입 정의
//! - **HTTP 통합**: Actix-Web ResponseError 자동 구현
//! - **자동 변환**: thiserror 기반 에러 체인 관리
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! // 리포지토리 정의
//! #[repository(collection = "users")]
//! struct UserRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! // 서비스 정의 (자동 의존성 주입)
//! #[service]
//! struct UserService {
//!     user_repo: Arc<UserRepository>,
//! }
//!
//! // 사용
//! let user_service = UserService::instance();
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 참조 감지
//! ```text
//! ❌ Circular dependency detected for type: UserService
//! panic: Circular dependency detected: UserService is already being initialized
//! ```
//! **해결**: 서비스 계층 구조를 재설계하여 단방향 의존성으로 변경
//!
//! ### 미등록 타입 에러
//! ```text
//! panic: Service not found: SampleService. Make sure it's registered...
//! ```
//! **해결**: `#[service]` 매크로 적용 또는 `ServiceLocator::set()` 으로 수동 등록

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
