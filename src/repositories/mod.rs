//! # Repositories Module
//!
//! 데이터 액세스 계층을 담당하는 리포지토리들을 정의합니다.
//! 모든 리포지토리는 `#[repository]` 매크로를 통해 싱글톤으로 관리되며,
//! MongoDB 컬렉션과 Redis 캐시를 통합합니다.

pub mod users;
