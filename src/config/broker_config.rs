//! Kafka 브로커 및 샘플링 세션 설정 모듈
//!
//! `KAFKA_*` 환경 변수를 읽어 임시 샘플링 세션이 사용할
//! [`SessionConfig`]를 구성합니다.

use std::env;
use std::time::Duration;

use crate::messaging::{OffsetPolicy, SaslConfig, SessionConfig};

/// 샘플링 타임아웃 기본값 (밀리초)
const DEFAULT_SAMPLE_TIMEOUT_MS: u64 = 2000;

/// Kafka 브로커 연결 설정
///
/// 환경 변수에서 로드되며, 샘플링 요청마다 [`SessionConfig`]로
/// 변환되어 임시 소비 세션에 전달됩니다.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// 브로커 부트스트랩 주소 목록
    pub bootstrap_servers: Vec<String>,
    /// 클라이언트 식별자
    pub client_id: String,
    /// 컨슈머 그룹 식별자
    pub group_id: String,
    /// 샘플링 대상 토픽
    pub topic: String,
    /// 오프셋 시작 정책
    pub offset_policy: OffsetPolicy,
    /// TLS 사용 여부
    pub ssl: bool,
    /// SASL 인증 정보 (미설정 시 인증 없이 연결)
    pub sasl: Option<SaslConfig>,
    /// 첫 메시지 대기 시간 상한
    pub sample_timeout: Duration,
}

impl BrokerConfig {
    /// 환경 변수에서 브로커 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_BOOTSTRAP_SERVERS` - 쉼표로 구분된 브로커 주소 (기본값: "localhost:9092")
    /// - `KAFKA_CLIENT_ID` - 클라이언트 ID (기본값: "sampler-service")
    /// - `KAFKA_GROUP_ID` - 컨슈머 그룹 ID (기본값: "sampler-group")
    /// - `KAFKA_TOPIC` - 대상 토픽 (기본값: "events")
    /// - `KAFKA_AUTO_OFFSET_RESET` - 정확히 "earliest"일 때만 Earliest, 그 외 Latest
    /// - `KAFKA_SSL` - "false"일 때만 비활성화 (기본값: true)
    /// - `KAFKA_SASL_MECHANISM` / `KAFKA_SASL_USERNAME` / `KAFKA_SASL_PASSWORD`
    ///   - 세 값이 모두 설정된 경우에만 SASL 인증 사용
    /// - `KAFKA_SAMPLE_TIMEOUT_MS` - 기본 샘플링 타임아웃 (기본값: 2000)
    pub fn from_env() -> Self {
        let bootstrap_servers = env::var("KAFKA_BOOTSTRAP_SERVERS")
            .unwrap_or_else(|_| "localhost:9092".to_string());
        let bootstrap_servers = Self::parse_servers(&bootstrap_servers);

        let offset_policy = OffsetPolicy::from_env_value(
            env::var("KAFKA_AUTO_OFFSET_RESET").ok().as_deref(),
        );

        Self {
            bootstrap_servers,
            client_id: env::var("KAFKA_CLIENT_ID")
                .unwrap_or_else(|_| "sampler-service".to_string()),
            group_id: env::var("KAFKA_GROUP_ID")
                .unwrap_or_else(|_| "sampler-group".to_string()),
            topic: env::var("KAFKA_TOPIC").unwrap_or_else(|_| "events".to_string()),
            offset_policy,
            ssl: env::var("KAFKA_SSL").map(|v| v != "false").unwrap_or(true),
            sasl: Self::sasl_from_env(),
            sample_timeout: Self::parse_timeout(env::var("KAFKA_SAMPLE_TIMEOUT_MS").ok()),
        }
    }

    /// 쉼표로 구분된 브로커 주소 문자열을 파싱합니다.
    /// 공백과 빈 항목은 제거됩니다.
    fn parse_servers(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// SASL 환경 변수 세 값이 모두 설정된 경우에만 인증 정보를 구성합니다.
    fn sasl_from_env() -> Option<SaslConfig> {
        let mechanism = env::var("KAFKA_SASL_MECHANISM").ok()?;
        let username = env::var("KAFKA_SASL_USERNAME").ok()?;
        let password = env::var("KAFKA_SASL_PASSWORD").ok()?;

        Some(SaslConfig {
            mechanism,
            username,
            password,
        })
    }

    /// 타임아웃 환경 변수를 파싱합니다. 파싱 실패 시 기본값을 사용합니다.
    fn parse_timeout(raw: Option<String>) -> Duration {
        let millis = raw
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SAMPLE_TIMEOUT_MS);

        Duration::from_millis(millis)
    }

    /// 임시 소비 세션용 [`SessionConfig`]로 변환합니다.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            brokers: self.bootstrap_servers.clone(),
            client_id: self.client_id.clone(),
            group_id: self.group_id.clone(),
            topic: self.topic.clone(),
            offset_policy: self.offset_policy,
            ssl: self.ssl,
            sasl: self.sasl.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_servers_splits_and_trims() {
        let servers = BrokerConfig::parse_servers("broker1:9092, broker2:9092 ,");
        assert_eq!(servers, vec!["broker1:9092", "broker2:9092"]);
    }

    #[test]
    fn test_parse_timeout_defaults_on_invalid() {
        assert_eq!(
            BrokerConfig::parse_timeout(None),
            Duration::from_millis(2000)
        );
        assert_eq!(
            BrokerConfig::parse_timeout(Some("abc".to_string())),
            Duration::from_millis(2000)
        );
        assert_eq!(
            BrokerConfig::parse_timeout(Some("500".to_string())),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_session_config_mapping() {
        let config = BrokerConfig {
            bootstrap_servers: vec!["broker1:9092".to_string()],
            client_id: "client".to_string(),
            group_id: "group".to_string(),
            topic: "events".to_string(),
            offset_policy: OffsetPolicy::Earliest,
            ssl: true,
            sasl: Some(SaslConfig {
                mechanism: "PLAIN".to_string(),
                username: "user".to_string(),
                password: "secret".to_string(),
            }),
            sample_timeout: Duration::from_millis(2000),
        };

        let session = config.session_config();
        assert_eq!(session.brokers, vec!["broker1:9092"]);
        assert_eq!(session.topic, "events");
        assert_eq!(session.offset_policy, OffsetPolicy::Earliest);
        assert!(session.ssl);
        assert_eq!(session.sasl.unwrap().mechanism, "PLAIN");
    }
}
