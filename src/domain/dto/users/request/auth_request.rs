//! 인증 요청관련 DTO
//!
//! 인증을 요청하는 사용자들의 요청 정보를 매핑합니다.
use serde::Deserialize;
use validator::Validate;

/// 로컬 로그인 요청 구조체
#[derive(Debug, Deserialize, Validate)]
pub struct LocalLoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}
