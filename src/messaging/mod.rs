//! # Messaging Module
//!
//! Kafka 토픽 단건 샘플링을 담당하는 모듈입니다.
//!
//! 요청마다 독립적인 임시 소비 세션을 열어 첫 메시지 도착,
//! 타임아웃, 취소 중 먼저 발생하는 사건까지만 대기한 뒤
//! 세션을 반드시 해제합니다. 세션은 요청 간에 공유되지 않으며
//! 오프셋 커밋도 수행하지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`config`] - 세션 설정 및 오프셋 정책
//! - [`sampler`] - 샘플링 수명주기 오케스트레이션 ([`EphemeralSampler`])
//! - [`kafka`] - rdkafka 기반 브로커 커넥터 구현
//!
//! ## 샘플링 수명주기
//!
//! ```text
//! validate → connect → subscribe → race(첫 메시지 | 타임아웃 | 취소) → close
//! ```
//!
//! 연결 실패 시에는 구독과 해제를 시도하지 않습니다.
//! 세션이 한 번 열리면 결과와 무관하게 정확히 한 번 해제됩니다.

pub mod config;
pub mod kafka;
pub mod sampler;

pub use config::{OffsetPolicy, SaslConfig, SessionConfig};
pub use kafka::KafkaConnector;
pub use sampler::{
    BrokerConnector, BrokerSession, EphemeralSampler, SampleError, SampleOutcome, SampledMessage,
};
