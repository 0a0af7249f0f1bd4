//! # HTTP Handlers Module
//!
//! HTTP 요청을 받아 서비스 계층에 위임하는 핸들러들을 정의합니다.
//!
//! ## 모듈 구성
//!
//! - [`users`] - 사용자 계정 CRUD 핸들러
//! - [`auth`] - 로컬 로그인 핸들러
//! - [`messages`] - Kafka 메시지 샘플링 핸들러

pub mod users;
pub mod auth;
pub mod messages;
