//! # Services Module
//!
//! 비즈니스 로직 계층을 담당하는 서비스들을 정의합니다.
//! 모든 서비스는 `#[service]` 매크로를 통해 싱글톤으로 관리되며,
//! 리포지토리 의존성이 자동으로 주입됩니다.

pub mod users;
