//! 기간별 차트 수집 모듈.
//!
//! 시작 시각부터 고정 간격으로 종료 시각(포함)까지 순회하며 차트를 수집합니다.
//!
//! # 동작
//!
//! - 시점마다 `ChartCollector::fetch` 호출 후 결과를 누적
//! - 누적 레코드 수가 체크포인트 단위(기본 100)의 배수가 되면 전체를 JSON으로 저장
//! - 순회 완료 시 CSV로 내보내고 이번 실행의 체크포인트 삭제
//! - 순회 중 오류 발생 시 지금까지의 데이터만 반환 (내보내기/정리 없음)

use super::checkpoint::CheckpointStore;
use super::collector::ChartCollector;
use super::export::{export_csv, export_path};
use crate::{
    expected_ticks, ChartRecord, CollectionStats, CollectorConfig, CollectorError, IntervalKind,
    Result,
};
use chart_data::{ChartProvider, MelonChartClient};
use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 기간 수집 결과
#[derive(Debug)]
pub struct RunOutcome {
    /// 누적 레코드 전체
    pub records: Vec<ChartRecord>,
    /// CSV 경로 (정상 완료 시에만)
    pub export_path: Option<PathBuf>,
    /// 디스크에 남아 있는 체크포인트
    pub leftover_checkpoints: Vec<PathBuf>,
    /// 수집 통계
    pub stats: CollectionStats,
}

impl RunOutcome {
    /// 순회와 내보내기까지 정상 완료되었는지 여부
    pub fn is_complete(&self) -> bool {
        self.export_path.is_some()
    }
}

/// 한 번의 실행 동안 누적되는 상태
struct RunState {
    records: Vec<ChartRecord>,
    checkpoints: CheckpointStore,
    stats: CollectionStats,
}

/// 기간별 수집기
pub struct PeriodRunner {
    provider: Arc<dyn ChartProvider>,
    config: CollectorConfig,
    show_progress: bool,
}

impl PeriodRunner {
    pub fn new(provider: Arc<dyn ChartProvider>, config: CollectorConfig) -> Self {
        Self {
            provider,
            config,
            show_progress: false,
        }
    }

    /// 설정의 URL로 멜론 클라이언트를 만들어 생성
    pub fn melon(config: CollectorConfig) -> Result<Self> {
        let client = MelonChartClient::with_base_url(config.chart.base_url.clone())?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// 진행률 표시줄 사용 여부
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 기간별 차트 수집
    ///
    /// `end >= start`는 호출자가 보장합니다. 오류는 반환하지 않으며
    /// 실패 시 로그를 남기고 그때까지 누적된 레코드를 돌려줍니다.
    pub async fn run(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: IntervalKind,
        delay: Duration,
    ) -> RunOutcome {
        let started = Instant::now();
        let total_ticks = expected_ticks(start, end, interval);

        tracing::info!(
            start = %start,
            end = %end,
            interval = %interval,
            ticks = total_ticks,
            delay_ms = delay.as_millis() as u64,
            "기간별 차트 수집 시작"
        );

        let collector = ChartCollector::new(
            Arc::clone(&self.provider),
            self.config.chart.image_size,
            delay,
        );
        let mut state = RunState {
            records: Vec::new(),
            checkpoints: CheckpointStore::new(
                &self.config.output.dir,
                &self.config.output.file_prefix,
            ),
            stats: CollectionStats::new(),
        };
        let pb = self.progress_bar(total_ticks);

        let result = match self
            .walk(&collector, start, end, interval, &mut state, &pb)
            .await
        {
            Ok(()) => self.export(start, end, &state.records),
            Err(e) => Err(e),
        };
        pb.finish_and_clear();

        let export_path = match result {
            Ok(path) => {
                let removed = state.checkpoints.clear();
                tracing::info!(removed = removed, "체크포인트 정리 완료");
                Some(path)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    records = state.records.len(),
                    checkpoints = state.checkpoints.written().len(),
                    "오류 발생, 수집 중단"
                );
                None
            }
        };

        state.stats.total_records = state.records.len();
        state.stats.elapsed = started.elapsed();

        RunOutcome {
            records: state.records,
            export_path,
            leftover_checkpoints: state.checkpoints.written().to_vec(),
            stats: state.stats,
        }
    }

    /// 고정 간격 순회 (종료 시각 포함)
    async fn walk(
        &self,
        collector: &ChartCollector,
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: IntervalKind,
        state: &mut RunState,
        pb: &ProgressBar,
    ) -> Result<()> {
        let step = interval.duration();
        let mut current = start;

        while current <= end {
            let batch = collector.fetch(current, &mut state.stats).await;
            state.records.extend(batch);

            if self.should_checkpoint(state.records.len()) {
                match state.checkpoints.save(&state.records, current) {
                    Ok(path) => {
                        state.stats.checkpoints += 1;
                        tracing::info!(
                            path = %path.display(),
                            records = state.records.len(),
                            "중간 데이터 저장 완료"
                        );
                    }
                    Err(e) => {
                        tracing::error!(tick = %current, error = %e, "중간 데이터 저장 실패");
                    }
                }
            }

            pb.inc(1);
            current = current
                .checked_add_signed(step)
                .ok_or(CollectorError::TimeOverflow(current))?;
        }

        Ok(())
    }

    /// 누적 레코드 수가 체크포인트 단위의 양의 배수인지 확인
    fn should_checkpoint(&self, len: usize) -> bool {
        let every = self.config.output.checkpoint_every;
        every > 0 && len > 0 && len % every == 0
    }

    fn export(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        records: &[ChartRecord],
    ) -> Result<PathBuf> {
        let path = export_path(
            &self.config.output.dir,
            &self.config.output.file_prefix,
            start,
            end,
        );
        export_csv(&path, records)?;
        Ok(path)
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message("차트 데이터 수집");
        pb
    }
}
