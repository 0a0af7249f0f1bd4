//! # Caching Module
//!
//! Redis 기반 캐싱 기능을 제공하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! - [`redis`] - Redis 클라이언트 래퍼 (JSON 직렬화, TTL 지원)

pub mod redis;

pub use redis::RedisClient;
