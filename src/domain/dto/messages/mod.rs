//! 메시지 샘플링 응답 DTO 모듈

pub mod sample_response;

pub use sample_response::SampledMessageResponse;
