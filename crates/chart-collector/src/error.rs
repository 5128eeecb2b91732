//! 에러 타입 정의.

use chart_data::ChartError;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 파일 입출력 에러
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON 직렬화 에러 (체크포인트)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV 작성 에러 (최종 내보내기)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),
    /// 데이터 소스 에러 (멜론 등)
    #[error("Data source error: {0}")]
    DataSource(#[from] ChartError),
    /// 다음 수집 시각 계산 불가
    #[error("Timestamp overflow after {0}")]
    TimeOverflow(NaiveDateTime),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
