//! 샘플링 세션 설정
//!
//! 임시 소비 세션 하나를 여는 데 필요한 모든 연결 정보를 정의합니다.

use crate::messaging::sampler::SampleError;

/// 구독 시작 오프셋 정책
///
/// 컨슈머 그룹에 저장된 오프셋이 없을 때 어느 위치에서
/// 소비를 시작할지 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetPolicy {
    /// 토픽의 가장 오래된 메시지부터 소비
    Earliest,
    /// 구독 이후 도착하는 메시지만 소비
    #[default]
    Latest,
}

impl OffsetPolicy {
    /// 브로커 설정 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetPolicy::Earliest => "earliest",
            OffsetPolicy::Latest => "latest",
        }
    }

    /// 환경 변수 값에서 정책을 결정합니다.
    ///
    /// 정확히 `"earliest"`인 경우에만 Earliest를 반환하며,
    /// 그 외 모든 값(미설정 포함)은 Latest로 처리됩니다.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("earliest") => OffsetPolicy::Earliest,
            _ => OffsetPolicy::Latest,
        }
    }
}

/// SASL 인증 정보
#[derive(Debug, Clone)]
pub struct SaslConfig {
    /// 인증 메커니즘 (PLAIN, SCRAM-SHA-256 등)
    pub mechanism: String,
    /// 사용자명
    pub username: String,
    /// 비밀번호
    pub password: String,
}

/// 임시 소비 세션 설정
///
/// 샘플링 요청 하나가 사용할 브로커 연결 정보입니다.
/// [`crate::config::BrokerConfig`]에서 생성됩니다.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 브로커 부트스트랩 주소 목록
    pub brokers: Vec<String>,
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
    /// SASL 인증 정보
    pub sasl: Option<SaslConfig>,
}

impl SessionConfig {
    /// 세션을 열기 전에 설정의 유효성을 검사합니다.
    ///
    /// 검증 실패 시 브로커 연결을 시도하지 않아야 하므로,
    /// 샘플링 수명주기의 가장 첫 단계에서 호출됩니다.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.brokers.is_empty() || self.brokers.iter().any(|b| b.trim().is_empty()) {
            return Err(SampleError::Config(
                "브로커 주소가 설정되지 않았습니다".to_string(),
            ));
        }

        if self.topic.trim().is_empty() {
            return Err(SampleError::Config(
                "샘플링 대상 토픽이 설정되지 않았습니다".to_string(),
            ));
        }

        if self.group_id.trim().is_empty() {
            return Err(SampleError::Config(
                "컨슈머 그룹 ID가 설정되지 않았습니다".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SessionConfig {
        SessionConfig {
            brokers: vec!["localhost:9092".to_string()],
            client_id: "test-client".to_string(),
            group_id: "test-group".to_string(),
            topic: "events".to_string(),
            offset_policy: OffsetPolicy::Latest,
            ssl: false,
            sasl: None,
        }
    }

    #[test]
    fn test_offset_policy_strict_earliest_match() {
        assert_eq!(
            OffsetPolicy::from_env_value(Some("earliest")),
            OffsetPolicy::Earliest
        );
        // 대소문자나 유사 값은 모두 latest로 처리
        assert_eq!(
            OffsetPolicy::from_env_value(Some("Earliest")),
            OffsetPolicy::Latest
        );
        assert_eq!(
            OffsetPolicy::from_env_value(Some("beginning")),
            OffsetPolicy::Latest
        );
        assert_eq!(OffsetPolicy::from_env_value(None), OffsetPolicy::Latest);
    }

    #[test]
    fn test_offset_policy_as_str() {
        assert_eq!(OffsetPolicy::Earliest.as_str(), "earliest");
        assert_eq!(OffsetPolicy::Latest.as_str(), "latest");
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_brokers_rejected() {
        let mut config = valid_config();
        config.brokers = Vec::new();
        assert!(matches!(config.validate(), Err(SampleError::Config(_))));
    }

    #[test]
    fn test_blank_broker_entry_rejected() {
        let mut config = valid_config();
        config.brokers = vec!["localhost:9092".to_string(), "  ".to_string()];
        assert!(matches!(config.validate(), Err(SampleError::Config(_))));
    }

    #[test]
    fn test_empty_topic_rejected() {
        let mut config = valid_config();
        config.topic = String::new();
        assert!(matches!(config.validate(), Err(SampleError::Config(_))));
    }

    #[test]
    fn test_empty_group_rejected() {
        let mut config = valid_config();
        config.group_id = String::new();
        assert!(matches!(config.validate(), Err(SampleError::Config(_))));
    }
}
