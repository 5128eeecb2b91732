//! 차트 Provider 모듈.
//!
//! ## 멜론
//! - `MelonChartClient`: 멜론 모바일 앱 차트 API 클라이언트
//! - 실시간(현재 시각) TOP 100 차트만 제공하며 과거 시점 조회는 지원하지 않음

pub mod melon;

pub use melon::MelonChartClient;

use async_trait::async_trait;

use crate::Result;

/// 차트의 순위 항목 하나.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    /// 현재 순위
    pub rank: i64,
    /// 곡 제목
    pub title: String,
    /// 아티스트 (여러 명일 경우 ", "로 연결)
    pub artist: String,
    /// 이전 순위 (신곡이면 0일 수 있음)
    pub last_pos: i64,
    /// 신곡 여부
    pub is_new: bool,
    /// 앨범 이미지 URL
    pub image: String,
}

/// Provider가 반환한 차트 스냅샷.
#[derive(Debug, Clone, Default)]
pub struct ChartSnapshot {
    /// Provider 기준 순위 일자 (예: "2024.01.01")
    pub rank_day: Option<String>,
    /// Provider 기준 순위 시각 (예: "13:00")
    pub rank_hour: Option<String>,
    /// 순위 항목 (순위 오름차순)
    pub entries: Vec<ChartEntry>,
}

/// 차트 조회 Provider.
///
/// 시간 파라미터가 없습니다. 구현체는 항상 호출 시점의 차트를 반환합니다.
#[async_trait]
pub trait ChartProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 현재 차트 조회.
    ///
    /// # Arguments
    /// * `image_size` - 앨범 이미지 크기 (픽셀)
    async fn fetch_chart(&self, image_size: u32) -> Result<ChartSnapshot>;
}
