//! rdkafka 기반 브로커 커넥터 구현
//!
//! [`EphemeralSampler`](crate::messaging::EphemeralSampler)가 사용하는
//! 실제 Kafka 연결 계층입니다. 세션마다 새로운 `StreamConsumer`를
//! 생성하며, 오프셋 커밋 없이 메시지를 읽기만 합니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;

use crate::messaging::config::SessionConfig;
use crate::messaging::sampler::{BrokerConnector, BrokerSession, SampleError, SampledMessage};

/// 브로커 도달 가능성 확인에 사용하는 메타데이터 조회 타임아웃
const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka 브로커 커넥터
///
/// 상태를 갖지 않으며, 연결마다 독립적인 컨슈머를 생성합니다.
pub struct KafkaConnector;

impl KafkaConnector {
    pub fn new() -> Self {
        Self
    }

    /// 세션 설정을 rdkafka 클라이언트 설정으로 변환합니다.
    fn build_client_config(config: &SessionConfig) -> ClientConfig {
        let mut client_config = ClientConfig::new();

        client_config
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &config.client_id)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", config.offset_policy.as_str())
            // 일회성 세션이므로 오프셋을 커밋하지 않음
            .set("enable.auto.commit", "false")
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000");

        let security_protocol = match (config.ssl, config.sasl.as_ref()) {
            (true, Some(_)) => "sasl_ssl",
            (true, None) => "ssl",
            (false, Some(_)) => "sasl_plaintext",
            (false, None) => "plaintext",
        };
        client_config.set("security.protocol", security_protocol);

        if let Some(sasl) = &config.sasl {
            client_config
                .set("sasl.mechanisms", &sasl.mechanism)
                .set("sasl.username", &sasl.username)
                .set("sasl.password", &sasl.password);
        }

        client_config
    }
}

impl Default for KafkaConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerConnector for KafkaConnector {
    type Session = KafkaSession;

    /// 새 컨슈머를 생성하고 메타데이터 조회로 브로커 도달 가능성을 확인합니다.
    ///
    /// rdkafka의 컨슈머 생성은 브로커에 실제로 접속하지 않으므로,
    /// 연결 실패를 구독 전에 드러내기 위해 메타데이터를 조회합니다.
    async fn connect(&self, config: &SessionConfig) -> Result<KafkaSession, SampleError> {
        let consumer: StreamConsumer = Self::build_client_config(config)
            .create()
            .map_err(|e| SampleError::Connection(e.to_string()))?;

        let consumer = Arc::new(consumer);

        // 메타데이터 조회는 블로킹 호출이므로 워커 스레드에서 수행
        let probe = consumer.clone();
        tokio::task::spawn_blocking(move || {
            probe
                .fetch_metadata(None, METADATA_PROBE_TIMEOUT)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| SampleError::Connection(e.to_string()))?
        .map_err(SampleError::Connection)?;

        debug!("브로커 연결 확인됨: {}", config.brokers.join(","));

        Ok(KafkaSession {
            consumer,
            closed: false,
        })
    }
}

/// 단일 샘플링 요청에 종속된 Kafka 소비 세션
pub struct KafkaSession {
    consumer: Arc<StreamConsumer>,
    /// 중복 해제 방지 플래그
    closed: bool,
}

#[async_trait]
impl BrokerSession for KafkaSession {
    async fn subscribe(&mut self, topic: &str) -> Result<(), SampleError> {
        self.consumer
            .subscribe(&[topic])
            .map_err(|e| SampleError::Subscription(e.to_string()))
    }

    async fn next_message(&mut self) -> Result<SampledMessage, SampleError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| SampleError::Delivery(e.to_string()))?;

        Ok(SampledMessage {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            value: message.payload().map(|p| p.to_vec()).unwrap_or_default(),
        })
    }

    async fn close(&mut self) -> Result<(), SampleError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.consumer.unsubscribe();
        debug!("샘플링 세션 해제됨");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::config::{OffsetPolicy, SaslConfig};

    fn base_config() -> SessionConfig {
        SessionConfig {
            brokers: vec!["broker1:9092".to_string(), "broker2:9092".to_string()],
            client_id: "sampler-service".to_string(),
            group_id: "sampler-group".to_string(),
            topic: "events".to_string(),
            offset_policy: OffsetPolicy::Earliest,
            ssl: true,
            sasl: None,
        }
    }

    fn get(config: &ClientConfig, key: &str) -> String {
        config.get(key).expect("missing config key").to_string()
    }

    #[test]
    fn test_client_config_basic_keys() {
        let client_config = KafkaConnector::build_client_config(&base_config());

        assert_eq!(get(&client_config, "bootstrap.servers"), "broker1:9092,broker2:9092");
        assert_eq!(get(&client_config, "group.id"), "sampler-group");
        assert_eq!(get(&client_config, "auto.offset.reset"), "earliest");
        assert_eq!(get(&client_config, "enable.auto.commit"), "false");
    }

    #[test]
    fn test_security_protocol_without_sasl() {
        let client_config = KafkaConnector::build_client_config(&base_config());
        assert_eq!(get(&client_config, "security.protocol"), "ssl");

        let mut plain = base_config();
        plain.ssl = false;
        let client_config = KafkaConnector::build_client_config(&plain);
        assert_eq!(get(&client_config, "security.protocol"), "plaintext");
    }

    #[test]
    fn test_security_protocol_with_sasl() {
        let mut config = base_config();
        config.sasl = Some(SaslConfig {
            mechanism: "PLAIN".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
        });

        let client_config = KafkaConnector::build_client_config(&config);
        assert_eq!(get(&client_config, "security.protocol"), "sasl_ssl");
        assert_eq!(get(&client_config, "sasl.mechanisms"), "PLAIN");
        assert_eq!(get(&client_config, "sasl.username"), "user");
    }

    #[test]
    fn test_latest_offset_policy_mapped() {
        let mut config = base_config();
        config.offset_policy = OffsetPolicy::Latest;

        let client_config = KafkaConnector::build_client_config(&config);
        assert_eq!(get(&client_config, "auto.offset.reset"), "latest");
    }
}
