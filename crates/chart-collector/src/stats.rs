//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 수집 시점(틱) 수
    pub ticks: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수 (Provider 실패)
    pub errors: usize,
    /// 빈 데이터 (조회 성공, 항목 없음)
    pub empty: usize,
    /// 누적 레코드 수
    pub total_records: usize,
    /// 저장된 체크포인트 수
    pub checkpoints: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            (self.success as f64 / self.ticks as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            ticks = self.ticks,
            success = self.success,
            errors = self.errors,
            empty = self.empty,
            total_records = self.total_records,
            checkpoints = self.checkpoints,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
