//! 차트 데이터 Provider.
//!
//! 외부 음원 차트 서비스에서 "현재" 차트를 가져오는 클라이언트를 제공합니다:
//! - `ChartProvider`: 차트 조회 trait (수집기와의 경계)
//! - `MelonChartClient`: 멜론 모바일 차트 API 클라이언트

pub mod error;
pub mod provider;

pub use error::{ChartError, Result};
pub use provider::{ChartEntry, ChartProvider, ChartSnapshot, MelonChartClient};
