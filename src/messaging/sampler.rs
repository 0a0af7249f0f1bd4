//! 임시 샘플링 세션 오케스트레이션
//!
//! 하나의 샘플링 요청은 독립적인 브로커 세션을 열고,
//! 첫 메시지 도착 / 타임아웃 / 취소 중 가장 먼저 발생한 사건으로
//! 결과를 확정한 뒤 세션을 정확히 한 번 해제합니다.
//!
//! 브로커와의 실제 통신은 [`BrokerConnector`] / [`BrokerSession`] trait
//! 뒤로 분리되어 있어, 프로덕션에서는 rdkafka 구현을 사용하고
//! 테스트에서는 모의 구현으로 수명주기 규칙을 검증합니다.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::messaging::config::SessionConfig;

/// 샘플링 단계별 실패 유형
///
/// 어느 단계에서 실패했는지 구분하여 진단 정보를 보존합니다.
#[derive(Error, Debug)]
pub enum SampleError {
    /// 세션 설정이 유효하지 않음 (연결 시도 전에 발생)
    #[error("Invalid session config: {0}")]
    Config(String),

    /// 브로커 연결 실패
    #[error("Broker connection failed: {0}")]
    Connection(String),

    /// 토픽 구독 실패
    #[error("Topic subscription failed: {0}")]
    Subscription(String),

    /// 메시지 수신 중 오류
    #[error("Message delivery failed: {0}")]
    Delivery(String),

    /// 세션 해제 실패
    #[error("Session teardown failed: {0}")]
    Teardown(String),
}

/// 브로커에서 수신한 단일 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledMessage {
    /// 메시지가 수신된 토픽
    pub topic: String,
    /// 파티션 번호
    pub partition: i32,
    /// 파티션 내 오프셋
    pub offset: i64,
    /// 메시지 페이로드 (빈 페이로드는 빈 벡터)
    pub value: Vec<u8>,
}

/// 샘플링 시도의 최종 결과
///
/// 세 가지 결과는 상호 배타적이며, 어떤 결과든 세션 해제가
/// 완료된 후에만 반환됩니다.
#[derive(Debug)]
pub enum SampleOutcome {
    /// 타임아웃 전에 첫 메시지를 수신함
    Found(SampledMessage),
    /// 타임아웃(또는 취소)까지 메시지가 도착하지 않음
    NotFound,
    /// 수명주기 중 오류 발생
    Failed(SampleError),
}

/// 열려 있는 브로커 소비 세션
///
/// 세션은 단일 샘플링 요청에 종속되며 요청 간에 재사용되지 않습니다.
#[async_trait]
pub trait BrokerSession: Send {
    /// 지정된 토픽 구독을 시작합니다.
    async fn subscribe(&mut self, topic: &str) -> Result<(), SampleError>;

    /// 다음 메시지가 도착할 때까지 대기합니다.
    ///
    /// 타임아웃은 호출자가 관리하므로 이 메서드는 무기한 대기할 수 있습니다.
    async fn next_message(&mut self) -> Result<SampledMessage, SampleError>;

    /// 세션을 해제합니다.
    ///
    /// 멱등해야 합니다. 두 번째 이후 호출은 아무 효과 없이 성공해야 합니다.
    async fn close(&mut self) -> Result<(), SampleError>;
}

/// 브로커 세션 팩토리
///
/// 연결 자체가 실패하면 세션은 생성되지 않으며,
/// 호출자는 해제를 시도할 필요가 없습니다.
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// 이 커넥터가 생성하는 세션 타입
    type Session: BrokerSession;

    /// 새 소비 세션을 열고 브로커 도달 가능성을 확인합니다.
    async fn connect(&self, config: &SessionConfig) -> Result<Self::Session, SampleError>;
}

/// 일회성 샘플링 세션 실행기
///
/// 요청마다 `validate → connect → subscribe → race → close` 수명주기를
/// 수행합니다. 고정 대기 없이 첫 메시지가 도착하는 즉시 반환하며,
/// 세션이 열린 이후에는 결과와 무관하게 해제가 보장됩니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let sampler = EphemeralSampler::new(KafkaConnector::new());
/// let outcome = sampler.sample(&config, Duration::from_millis(2000)).await;
/// ```
pub struct EphemeralSampler<C: BrokerConnector> {
    connector: C,
}

impl<C: BrokerConnector> EphemeralSampler<C> {
    /// 새 샘플러를 생성합니다.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// 첫 메시지 또는 타임아웃까지 대기하며 한 번 샘플링합니다.
    pub async fn sample(&self, config: &SessionConfig, timeout: Duration) -> SampleOutcome {
        self.sample_with_cancel(config, timeout, CancellationToken::new())
            .await
    }

    /// 취소 토큰과 함께 샘플링합니다.
    ///
    /// 취소는 오류가 아니라 조기 타임아웃으로 취급되어 `NotFound`를
    /// 반환하며, 열린 세션은 동일하게 해제됩니다.
    pub async fn sample_with_cancel(
        &self,
        config: &SessionConfig,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> SampleOutcome {
        // 1단계: 설정 검증 (실패 시 연결 시도 없음)
        if let Err(e) = config.validate() {
            return SampleOutcome::Failed(e);
        }

        // 2단계: 연결 (실패 시 세션이 존재하지 않으므로 해제 불필요)
        let mut session = match self.connector.connect(config).await {
            Ok(session) => session,
            Err(e) => {
                warn!("브로커 연결 실패: {}", e);
                return SampleOutcome::Failed(e);
            }
        };

        debug!("샘플링 세션 시작: topic={}", config.topic);

        // 3단계: 구독 (실패해도 열린 세션은 해제해야 함)
        let outcome = match session.subscribe(&config.topic).await {
            Ok(()) => Self::race_first_delivery(&mut session, timeout, &cancel).await,
            Err(e) => SampleOutcome::Failed(e),
        };

        // 4단계: 무조건적 세션 해제
        Self::finish(session, outcome).await
    }

    /// 첫 메시지 도착, 타임아웃, 취소 중 먼저 발생한 사건으로 결과를 결정합니다.
    async fn race_first_delivery(
        session: &mut C::Session,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> SampleOutcome {
        tokio::select! {
            delivery = session.next_message() => match delivery {
                Ok(message) => {
                    info!(
                        "메시지 수신: topic={} partition={} offset={}",
                        message.topic, message.partition, message.offset
                    );
                    SampleOutcome::Found(message)
                }
                Err(e) => SampleOutcome::Failed(e),
            },
            _ = tokio::time::sleep(timeout) => {
                debug!("타임아웃까지 메시지 없음 ({:?})", timeout);
                SampleOutcome::NotFound
            }
            _ = cancel.cancelled() => {
                debug!("샘플링 취소됨");
                SampleOutcome::NotFound
            }
        }
    }

    /// 세션을 해제하고 최종 결과를 확정합니다.
    ///
    /// 해제 실패는 `NotFound`를 `Failed(Teardown)`으로 바꾸지만,
    /// 이미 확보한 메시지나 먼저 발생한 오류를 덮어쓰지는 않습니다.
    async fn finish(mut session: C::Session, outcome: SampleOutcome) -> SampleOutcome {
        match session.close().await {
            Ok(()) => outcome,
            Err(teardown) => match outcome {
                SampleOutcome::NotFound => SampleOutcome::Failed(teardown),
                other => {
                    warn!("세션 해제 실패 (결과 유지): {}", teardown);
                    other
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::config::OffsetPolicy;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    /// 모의 세션의 메시지 수신 동작
    enum Delivery {
        /// 지연 후 메시지 반환
        After(Duration, SampledMessage),
        /// 지연 없이 순서대로 여러 메시지 반환, 소진 후에는 무한 대기
        Sequence(Vec<SampledMessage>),
        /// 지연 후 수신 오류 반환
        ErrorAfter(Duration, String),
        /// 영원히 도착하지 않음
        Never,
    }

    struct MockSession {
        subscribe_error: Option<String>,
        delivery: Delivery,
        close_error: Option<String>,
        subscribe_count: Arc<AtomicUsize>,
        close_count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrokerSession for MockSession {
        async fn subscribe(&mut self, _topic: &str) -> Result<(), SampleError> {
            self.subscribe_count.fetch_add(1, Ordering::SeqCst);
            match self.subscribe_error.take() {
                Some(e) => Err(SampleError::Subscription(e)),
                None => Ok(()),
            }
        }

        async fn next_message(&mut self) -> Result<SampledMessage, SampleError> {
            match &mut self.delivery {
                Delivery::After(delay, message) => {
                    let delay = *delay;
                    let message = message.clone();
                    tokio::time::sleep(delay).await;
                    Ok(message)
                }
                Delivery::Sequence(messages) => {
                    if messages.is_empty() {
                        std::future::pending::<()>().await;
                        unreachable!()
                    }
                    Ok(messages.remove(0))
                }
                Delivery::ErrorAfter(delay, e) => {
                    let delay = *delay;
                    let e = e.clone();
                    tokio::time::sleep(delay).await;
                    Err(SampleError::Delivery(e))
                }
                Delivery::Never => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        async fn close(&mut self) -> Result<(), SampleError> {
            self.close_count.fetch_add(1, Ordering::SeqCst);
            match self.close_error.take() {
                Some(e) => Err(SampleError::Teardown(e)),
                None => Ok(()),
            }
        }
    }

    /// 세션 생성을 스크립팅할 수 있는 모의 커넥터
    struct MockConnector {
        connect_error: Option<String>,
        subscribe_error: Option<String>,
        delivery_delay: Option<Duration>,
        delivery_message: Option<SampledMessage>,
        delivery_sequence: Option<Vec<SampledMessage>>,
        delivery_error: Option<String>,
        close_error: Option<String>,
        connect_count: Arc<AtomicUsize>,
        subscribe_count: Arc<AtomicUsize>,
        close_count: Arc<AtomicUsize>,
    }

    impl MockConnector {
        fn new() -> Self {
            Self {
                connect_error: None,
                subscribe_error: None,
                delivery_delay: None,
                delivery_message: None,
                delivery_sequence: None,
                delivery_error: None,
                close_error: None,
                connect_count: Arc::new(AtomicUsize::new(0)),
                subscribe_count: Arc::new(AtomicUsize::new(0)),
                close_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn delivering(message: SampledMessage, delay: Duration) -> Self {
            let mut connector = Self::new();
            connector.delivery_message = Some(message);
            connector.delivery_delay = Some(delay);
            connector
        }

        fn delivering_sequence(messages: Vec<SampledMessage>) -> Self {
            let mut connector = Self::new();
            connector.delivery_sequence = Some(messages);
            connector
        }

        fn silent() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl BrokerConnector for MockConnector {
        type Session = MockSession;

        async fn connect(&self, _config: &SessionConfig) -> Result<MockSession, SampleError> {
            self.connect_count.fetch_add(1, Ordering::SeqCst);

            if let Some(e) = &self.connect_error {
                return Err(SampleError::Connection(e.clone()));
            }

            let delivery = if let Some(messages) = &self.delivery_sequence {
                Delivery::Sequence(messages.clone())
            } else if let Some(e) = &self.delivery_error {
                Delivery::ErrorAfter(
                    self.delivery_delay.unwrap_or(Duration::ZERO),
                    e.clone(),
                )
            } else if let Some(message) = &self.delivery_message {
                Delivery::After(
                    self.delivery_delay.unwrap_or(Duration::ZERO),
                    message.clone(),
                )
            } else {
                Delivery::Never
            };

            Ok(MockSession {
                subscribe_error: self.subscribe_error.clone(),
                delivery,
                close_error: self.close_error.clone(),
                subscribe_count: self.subscribe_count.clone(),
                close_count: self.close_count.clone(),
            })
        }
    }

    fn test_config() -> SessionConfig {
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

    fn test_message() -> SampledMessage {
        SampledMessage {
            topic: "events".to_string(),
            partition: 1,
            offset: 42,
            value: b"payload".to_vec(),
        }
    }

    #[tokio::test]
    async fn first_message_returns_before_timeout() {
        let connector = MockConnector::delivering(test_message(), Duration::from_millis(10));
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let started = Instant::now();
        let outcome = sampler.sample(&test_config(), Duration::from_secs(5)).await;

        // 타임아웃 전체를 기다리지 않고 즉시 반환해야 함
        assert!(started.elapsed() < Duration::from_secs(1));
        match outcome {
            SampleOutcome::Found(message) => {
                assert_eq!(message.offset, 42);
                assert_eq!(message.value, b"payload");
            }
            other => panic!("expected Found, got {:?}", other),
        }
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_payload_is_preserved_as_found() {
        let mut message = test_message();
        message.value = Vec::new();
        let connector = MockConnector::delivering(message, Duration::ZERO);
        let sampler = EphemeralSampler::new(connector);

        match sampler.sample(&test_config(), Duration::from_secs(1)).await {
            SampleOutcome::Found(message) => assert!(message.value.is_empty()),
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rapid_second_message_does_not_replace_first() {
        let mut second = test_message();
        second.offset = 43;
        second.value = b"late".to_vec();
        let connector = MockConnector::delivering_sequence(vec![test_message(), second]);
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler.sample(&test_config(), Duration::from_secs(1)).await;

        // 연달아 도착한 두 번째 메시지는 결과에 반영되지 않음
        match outcome {
            SampleOutcome::Found(message) => {
                assert_eq!(message.offset, 42);
                assert_eq!(message.value, b"payload");
            }
            other => panic!("expected Found, got {:?}", other),
        }
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_without_message_is_not_found() {
        let connector = MockConnector::silent();
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let timeout = Duration::from_millis(50);
        let started = Instant::now();
        let outcome = sampler.sample(&test_config(), timeout).await;
        let elapsed = started.elapsed();

        // 타임아웃보다 이르지도, 크게 늦지도 않게 반환해야 함
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(500));
        assert!(matches!(outcome, SampleOutcome::NotFound));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn message_racing_ahead_of_timeout_wins() {
        // 타임아웃보다 빠른 메시지는 Found, 느린 메시지는 NotFound
        let fast = MockConnector::delivering(test_message(), Duration::from_millis(5));
        let slow = MockConnector::delivering(test_message(), Duration::from_millis(200));
        let sampler_fast = EphemeralSampler::new(fast);
        let sampler_slow = EphemeralSampler::new(slow);

        let timeout = Duration::from_millis(60);
        assert!(matches!(
            sampler_fast.sample(&test_config(), timeout).await,
            SampleOutcome::Found(_)
        ));
        assert!(matches!(
            sampler_slow.sample(&test_config(), timeout).await,
            SampleOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn invalid_config_fails_without_connecting() {
        let connector = MockConnector::silent();
        let connect_count = connector.connect_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let mut config = test_config();
        config.brokers = Vec::new();

        let outcome = sampler.sample(&config, Duration::from_millis(50)).await;

        assert!(matches!(
            outcome,
            SampleOutcome::Failed(SampleError::Config(_))
        ));
        assert_eq!(connect_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn connect_failure_skips_subscribe_and_teardown() {
        let mut connector = MockConnector::silent();
        connector.connect_error = Some("broker unreachable".to_string());
        let subscribe_count = connector.subscribe_count.clone();
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler.sample(&test_config(), Duration::from_millis(50)).await;

        assert!(matches!(
            outcome,
            SampleOutcome::Failed(SampleError::Connection(_))
        ));
        assert_eq!(subscribe_count.load(Ordering::SeqCst), 0);
        assert_eq!(close_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn subscribe_failure_still_closes_session() {
        let mut connector = MockConnector::silent();
        connector.subscribe_error = Some("unknown topic".to_string());
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler.sample(&test_config(), Duration::from_millis(50)).await;

        assert!(matches!(
            outcome,
            SampleOutcome::Failed(SampleError::Subscription(_))
        ));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delivery_error_still_closes_session() {
        let mut connector = MockConnector::silent();
        connector.delivery_error = Some("fetch error".to_string());
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler.sample(&test_config(), Duration::from_secs(1)).await;

        assert!(matches!(
            outcome,
            SampleOutcome::Failed(SampleError::Delivery(_))
        ));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn teardown_failure_surfaces_when_nothing_found() {
        let mut connector = MockConnector::silent();
        connector.close_error = Some("unsubscribe failed".to_string());
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler
            .sample(&test_config(), Duration::from_millis(30))
            .await;

        assert!(matches!(
            outcome,
            SampleOutcome::Failed(SampleError::Teardown(_))
        ));
    }

    #[tokio::test]
    async fn teardown_failure_does_not_discard_found_message() {
        let mut connector = MockConnector::delivering(test_message(), Duration::ZERO);
        connector.close_error = Some("unsubscribe failed".to_string());
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let outcome = sampler.sample(&test_config(), Duration::from_secs(1)).await;

        assert!(matches!(outcome, SampleOutcome::Found(_)));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_releases_session_as_not_found() {
        let connector = MockConnector::silent();
        let close_count = connector.close_count.clone();
        let sampler = EphemeralSampler::new(connector);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome = sampler
            .sample_with_cancel(&test_config(), Duration::from_secs(5), cancel)
            .await;

        // 취소는 타임아웃 전체를 기다리지 않아야 함
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(matches!(outcome, SampleOutcome::NotFound));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_samples_use_isolated_sessions() {
        let first = MockConnector::delivering(test_message(), Duration::from_millis(5));
        let second = MockConnector::silent();
        let first_closes = first.close_count.clone();
        let second_closes = second.close_count.clone();

        let sampler_a = EphemeralSampler::new(first);
        let sampler_b = EphemeralSampler::new(second);
        let config = test_config();

        let (outcome_a, outcome_b) = tokio::join!(
            sampler_a.sample(&config, Duration::from_millis(100)),
            sampler_b.sample(&config, Duration::from_millis(30)),
        );

        // 한쪽의 수신이 다른 쪽의 결과에 영향을 주지 않음
        assert!(matches!(outcome_a, SampleOutcome::Found(_)));
        assert!(matches!(outcome_b, SampleOutcome::NotFound));
        assert_eq!(first_closes.load(Ordering::SeqCst), 1);
        assert_eq!(second_closes.load(Ordering::SeqCst), 1);
    }
}
