//! # Domain Module
//!
//! 애플리케이션의 핵심 도메인 모델을 정의하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! - [`entities`] - 영속화되는 도메인 엔티티 (MongoDB 문서)
//! - [`dto`] - HTTP 요청/응답 데이터 전송 객체

pub mod entities;
pub mod dto;
