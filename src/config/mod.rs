//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 데이터베이스, 서버, 환경 관련 설정
//! - [`broker_config`] - Kafka 브로커 연결 및 샘플링 세션 설정
//!
//! ## 설계 원칙
//!
//! ### 1. 환경 분리 (Environment Separation)
//!
//! 개발, 테스트, 스테이징, 프로덕션 환경별로 다른 설정값을 제공합니다.
//!
//! ### 2. 보안 우선 (Security First)
//!
//! - 민감한 정보(SASL 자격 증명 등)는 환경 변수로만 제공
//! - 기본값은 개발 환경에서만 안전
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # Kafka 브로커 설정
//! export KAFKA_BOOTSTRAP_SERVERS="broker1:9092,broker2:9092"
//! export KAFKA_CLIENT_ID="sampler-service"
//! export KAFKA_GROUP_ID="sampler-group"
//! export KAFKA_TOPIC="events"
//! export KAFKA_AUTO_OFFSET_RESET="earliest"   # 그 외 값은 latest
//! export KAFKA_SAMPLE_TIMEOUT_MS="2000"
//!
//! # SASL 인증 (사용 시)
//! export KAFKA_SASL_MECHANISM="PLAIN"
//! export KAFKA_SASL_USERNAME="user"
//! export KAFKA_SASL_PASSWORD="secret"
//!
//! # 보안 설정
//! export BCRYPT_COST="12"          # 4-15 범위
//! ```

pub mod data_config;
pub mod broker_config;

pub use data_config::*;
pub use broker_config::*;
