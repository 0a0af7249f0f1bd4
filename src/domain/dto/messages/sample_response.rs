//! 메시지 샘플링 응답 DTO
//!
//! 브로커에서 수신한 원시 메시지를 HTTP 응답용 구조로 변환합니다.

use serde::{Deserialize, Serialize};

use crate::messaging::SampledMessage;

/// 샘플링된 메시지 응답 DTO
///
/// 페이로드 바이트는 UTF-8 문자열로 변환되며,
/// 유효하지 않은 시퀀스는 대체 문자로 치환됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledMessageResponse {
    /// 메시지가 수신된 토픽
    pub topic: String,
    /// 파티션 번호
    pub partition: i32,
    /// 파티션 내 오프셋
    pub offset: i64,
    /// 메시지 본문 (UTF-8 변환)
    pub value: String,
}

impl From<SampledMessage> for SampledMessageResponse {
    fn from(message: SampledMessage) -> Self {
        Self {
            topic: message.topic,
            partition: message.partition,
            offset: message.offset,
            value: String::from_utf8_lossy(&message.value).into_owned(),
        }
    }
}
