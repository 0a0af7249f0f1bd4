//! 데이터 전송 객체(DTO) 모듈
//!
//! HTTP 계층과 도메인 계층 사이의 데이터 변환을 담당합니다.
//!
//! - [`users`] - 사용자 계정 관련 요청/응답 DTO
//! - [`messages`] - 메시지 샘플링 응답 DTO

pub mod users;
pub mod messages;
