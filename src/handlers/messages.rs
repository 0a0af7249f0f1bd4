//! # Message Sampling HTTP Handlers
//!
//! Kafka 토픽 단건 샘플링 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! 요청마다 임시 소비 세션을 열어 첫 메시지 또는 타임아웃까지만
//! 대기한 뒤 세션을 해제하고 결과를 반환합니다.

use actix_web::{web, HttpResponse, get};
use log::warn;
use serde::Deserialize;
use validator::Validate;

use crate::config::BrokerConfig;
use crate::core::errors::AppError;
use crate::domain::dto::messages::SampledMessageResponse;
use crate::messaging::{EphemeralSampler, KafkaConnector, SampleError, SampleOutcome};

/// 샘플링 요청 쿼리 파라미터
#[derive(Debug, Deserialize, Validate)]
pub struct SampleQuery {
    /// 첫 메시지 대기 시간 상한 (밀리초, 1~60000)
    ///
    /// 생략 시 `KAFKA_SAMPLE_TIMEOUT_MS` 환경 변수 값을 사용합니다.
    #[validate(range(min = 1, max = 60000, message = "timeout_ms는 1-60000 범위여야 합니다"))]
    pub timeout_ms: Option<u64>,
}

impl From<SampleError> for AppError {
    fn from(e: SampleError) -> Self {
        match e {
            SampleError::Config(msg) => AppError::InternalError(format!("브로커 설정 오류: {}", msg)),
            other => AppError::ExternalServiceError(other.to_string()),
        }
    }
}

/// 메시지 샘플링 핸들러
///
/// 설정된 토픽에서 메시지를 정확히 하나 샘플링합니다.
///
/// # 엔드포인트
///
/// `GET /api/v1/messages/sample?timeout_ms=2000`
///
/// # 응답
///
/// ## 성공 (200 OK)
/// ```json
/// {
///   "message": {
///     "topic": "events",
///     "partition": 0,
///     "offset": 42,
///     "value": "{\"hello\":\"world\"}"
///   }
/// }
/// ```
///
/// ## 실패 사례
///
/// - `404 Not Found` - 타임아웃까지 메시지가 도착하지 않음
/// - `400 Bad Request` - timeout_ms 범위 초과
/// - `500 Internal Server Error` - 브로커 연결/구독/수신 실패
///
/// # 세션 수명주기
///
/// 이 엔드포인트는 호출마다 독립적인 컨슈머 세션을 생성하고,
/// 응답을 반환하기 전에 반드시 세션을 해제합니다.
/// 동시 요청은 서로의 세션에 영향을 주지 않습니다.
///
/// # 사용 예제
///
/// ```bash
/// curl "http://localhost:8080/api/v1/messages/sample?timeout_ms=5000"
/// ```
#[get("/sample")]
pub async fn sample_message(
    query: web::Query<SampleQuery>,
) -> Result<HttpResponse, AppError> {
    // 유효성 검사
    query.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let broker_config = BrokerConfig::from_env();
    let timeout = query.timeout_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or(broker_config.sample_timeout);

    let sampler = EphemeralSampler::new(KafkaConnector::new());
    let outcome = sampler.sample(&broker_config.session_config(), timeout).await;

    match outcome {
        SampleOutcome::Found(message) => {
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": SampledMessageResponse::from(message)
            })))
        }
        SampleOutcome::NotFound => {
            Err(AppError::NotFound("지정된 시간 내에 메시지가 도착하지 않았습니다".to_string()))
        }
        SampleOutcome::Failed(e) => {
            warn!("메시지 샘플링 실패: {}", e);
            Err(AppError::from(e))
        }
    }
}
