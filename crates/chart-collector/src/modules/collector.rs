//! 시점별 차트 수집 모듈.

use crate::{ChartRecord, CollectionStats};
use chart_data::ChartProvider;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;

/// 한 시점의 차트를 수집해 레코드로 변환합니다.
///
/// Provider는 요청 시각과 무관하게 항상 현재 차트를 반환합니다.
/// 레코드의 날짜/시간은 요청한 시각으로 기록됩니다.
pub struct ChartCollector {
    provider: Arc<dyn ChartProvider>,
    image_size: u32,
    delay: Duration,
}

impl ChartCollector {
    pub fn new(provider: Arc<dyn ChartProvider>, image_size: u32, delay: Duration) -> Self {
        Self {
            provider,
            image_size,
            delay,
        }
    }

    /// 지정 시각의 차트 수집
    ///
    /// Provider 오류는 로그만 남기고 빈 결과를 반환합니다.
    /// 호출 결과와 관계없이 Provider 호출 후 `delay`만큼 대기합니다.
    pub async fn fetch(&self, at: NaiveDateTime, stats: &mut CollectionStats) -> Vec<ChartRecord> {
        stats.ticks += 1;

        let result = self.provider.fetch_chart(self.image_size).await;

        // Rate limiting
        tokio::time::sleep(self.delay).await;

        match result {
            Ok(chart) if !chart.entries.is_empty() => {
                stats.success += 1;
                tracing::debug!(
                    tick = %at,
                    provider = self.provider.name(),
                    rank_day = chart.rank_day.as_deref().unwrap_or("-"),
                    rank_hour = chart.rank_hour.as_deref().unwrap_or("-"),
                    entries = chart.entries.len(),
                    "차트 수집 완료"
                );
                chart
                    .entries
                    .iter()
                    .map(|entry| ChartRecord::from_entry(entry, at))
                    .collect()
            }
            Ok(_) => {
                stats.empty += 1;
                tracing::debug!(tick = %at, "차트 항목 없음");
                Vec::new()
            }
            Err(e) => {
                stats.errors += 1;
                tracing::error!(
                    tick = %at,
                    provider = self.provider.name(),
                    error = %e,
                    "차트 데이터 수집 실패"
                );
                Vec::new()
            }
        }
    }
}
