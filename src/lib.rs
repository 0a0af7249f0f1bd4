//! 메시지 샘플링 백엔드 서비스
//!
//! Rust 기반의 사용자 계정 관리 + Kafka 토픽 단건 샘플링 서비스입니다.
//! 로컬 계정(이메일/비밀번호) 등록과 로그인, 그리고 Kafka 토픽에서
//! 메시지를 정확히 하나만 꺼내 보는 임시 소비 세션을 제공합니다.
//!
//! # Features
//!
//! - **사용자 관리**: 로컬 계정 생성, 조회, 삭제 (bcrypt 해싱)
//! - **메시지 샘플링**: 요청당 하나의 임시 Kafka 세션을 열어
//!   첫 메시지 또는 타임아웃까지 대기 후 세션을 반드시 해제
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//! - **MongoDB**: 사용자 데이터 영구 저장
//! - **Redis**: 사용자 조회 캐싱
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ├──────────────────────┐
//!          ▼                      ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │    Services     │   │    Messaging    │ ← EphemeralSampler
//! └─────────────────┘   └─────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │  Repositories   │   │  Kafka Broker   │
//! └─────────────────┘   └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use sampler_service_backend::config::BrokerConfig;
//! use sampler_service_backend::messaging::{EphemeralSampler, KafkaConnector, SampleOutcome};
//!
//! let sampler = EphemeralSampler::new(KafkaConnector::new());
//! let config = BrokerConfig::from_env().session_config();
//!
//! match sampler.sample(&config, Duration::from_secs(2)).await {
//!     SampleOutcome::Found(msg) => println!("메시지 수신: offset {}", msg.offset),
//!     SampleOutcome::NotFound => println!("타임아웃까지 메시지 없음"),
//!     SampleOutcome::Failed(e) => eprintln!("샘플링 실패: {}", e),
//! }
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod messaging;
pub mod utils;
pub mod routes;
pub mod handlers;
