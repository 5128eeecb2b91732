//! 차트 Provider 오류 타입.

use thiserror::Error;

/// 차트 조회 관련 오류.
#[derive(Debug, Error)]
pub enum ChartError {
    /// HTTP 요청 실패
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 비정상 응답 코드
    #[error("비정상 응답 코드: {0}")]
    Status(u16),

    /// 응답 파싱 실패
    #[error("응답 파싱 실패: {0}")]
    Parse(String),

    /// 필수 데이터 누락
    #[error("데이터 없음: {0}")]
    MissingData(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
