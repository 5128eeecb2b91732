//! Integration tests for the period runner with a scripted chart provider.

use async_trait::async_trait;
use chart_collector::modules::PeriodRunner;
use chart_collector::{expected_ticks, CollectorConfig, IntervalKind, RankDelta};
use chart_data::{ChartEntry, ChartError, ChartProvider, ChartSnapshot};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Provider returning `entries` rows per call, failing on the listed call indices.
struct ScriptedProvider {
    calls: AtomicUsize,
    entries: usize,
    fail_on: Vec<usize>,
}

impl ScriptedProvider {
    fn new(entries: usize) -> Arc<Self> {
        Self::failing(entries, Vec::new())
    }

    fn failing(entries: usize, fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            entries,
            fail_on,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_chart(&self, image_size: u32) -> chart_data::Result<ChartSnapshot> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(ChartError::Status(500));
        }

        let entries = (1..=self.entries as i64)
            .map(|rank| ChartEntry {
                rank,
                title: format!("곡 {}", rank),
                artist: format!("아티스트 {}", rank),
                last_pos: if rank % 5 == 0 { 0 } else { rank + 2 },
                is_new: rank % 5 == 0,
                image: format!("https://cdn/{}.jpg/melon/resize/{}", rank, image_size),
            })
            .collect();

        Ok(ChartSnapshot {
            rank_day: None,
            rank_hour: None,
            entries,
        })
    }
}

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn config_for(dir: &Path) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.output.dir = dir.to_path_buf();
    config
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect();
    files.sort();
    files
}

#[tokio::test(start_paused = true)]
async fn test_hourly_walk_calls_provider_per_tick() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(100);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    let start = dt(2024, 1, 1, 0, 0);
    let end = dt(2024, 1, 1, 2, 0);
    let outcome = runner
        .run(start, end, IntervalKind::Hour, Duration::from_secs(2))
        .await;

    assert_eq!(provider.calls(), 3);
    assert_eq!(outcome.records.len(), 300);
    assert!(outcome.is_complete());

    let times: Vec<String> = outcome
        .records
        .iter()
        .map(|r| r.time().format("%H:%M").to_string())
        .collect();
    assert_eq!(times[0], "00:00");
    assert_eq!(times[100], "01:00");
    assert_eq!(times[299], "02:00");
    assert!(outcome.records.iter().all(|r| r.date() == start.date()));
}

#[tokio::test(start_paused = true)]
async fn test_tick_count_matches_interval_for_every_kind() {
    let start = dt(2024, 1, 1, 0, 0);
    let end = dt(2025, 3, 1, 5, 0);

    for interval in IntervalKind::ALL {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new(0);
        let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

        let outcome = runner.run(start, end, interval, Duration::ZERO).await;

        let span = (end - start).num_seconds();
        let step = interval.duration().num_seconds();
        let expected = (span / step) as usize + 1;

        assert_eq!(provider.calls(), expected, "interval {}", interval);
        assert_eq!(expected as u64, expected_ticks(start, end, interval));
        assert_eq!(outcome.stats.ticks, expected);
        assert_eq!(outcome.stats.empty, expected);
        assert!(outcome.is_complete());
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_tick_when_start_equals_end() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(10);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    let at = dt(2024, 6, 1, 12, 0);
    let outcome = runner.run(at, at, IntervalKind::Year, Duration::ZERO).await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(outcome.records.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_rank_delta_for_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let runner = PeriodRunner::new(ScriptedProvider::new(20), config_for(dir.path()));

    let outcome = runner
        .run(
            dt(2024, 1, 1, 0, 0),
            dt(2024, 1, 3, 0, 0),
            IntervalKind::Day,
            Duration::ZERO,
        )
        .await;

    assert_eq!(outcome.records.len(), 60);
    for record in &outcome.records {
        if record.is_new() {
            assert_eq!(record.rank_delta(), RankDelta::New);
        } else {
            assert_eq!(
                record.rank_delta(),
                RankDelta::Change(record.previous_rank() - record.rank())
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_checkpoints_on_multiples_of_100_and_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    // 50개씩 4번: 누적 50, 100, 150, 200 → 2번째와 4번째 시점에서 저장
    let runner = PeriodRunner::new(ScriptedProvider::new(50), config_for(dir.path()));

    let start = dt(2024, 1, 1, 0, 0);
    let end = dt(2024, 1, 1, 3, 0);
    let outcome = runner.run(start, end, IntervalKind::Hour, Duration::ZERO).await;

    assert_eq!(outcome.stats.checkpoints, 2);
    assert!(outcome.leftover_checkpoints.is_empty());
    assert!(files_with_extension(dir.path(), "json").is_empty());

    let csv_files = files_with_extension(dir.path(), "csv");
    assert_eq!(csv_files.len(), 1);
    assert_eq!(
        csv_files[0].file_name().unwrap(),
        "chart_data_20240101_20240101.csv"
    );
    assert_eq!(outcome.export_path.as_deref(), Some(csv_files[0].as_path()));

    let text = std::fs::read_to_string(&csv_files[0]).unwrap();
    assert!(text.starts_with('\u{feff}'));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1 + 200);
    assert!(lines[0].ends_with("날짜,시간,순위,제목,아티스트,이전순위,신곡여부,앨범이미지,순위변동"));
}

#[tokio::test(start_paused = true)]
async fn test_no_checkpoint_when_count_never_hits_multiple() {
    let dir = tempfile::tempdir().unwrap();
    let runner = PeriodRunner::new(ScriptedProvider::new(30), config_for(dir.path()));

    let outcome = runner
        .run(
            dt(2024, 1, 1, 0, 0),
            dt(2024, 1, 1, 2, 0),
            IntervalKind::Hour,
            Duration::ZERO,
        )
        .await;

    assert_eq!(outcome.records.len(), 90);
    assert_eq!(outcome.stats.checkpoints, 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_tick_contributes_nothing_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::failing(100, vec![1]);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    let outcome = runner
        .run(
            dt(2024, 1, 1, 0, 0),
            dt(2024, 1, 1, 2, 0),
            IntervalKind::Hour,
            Duration::from_millis(500),
        )
        .await;

    assert_eq!(provider.calls(), 3);
    assert_eq!(outcome.records.len(), 200);
    assert_eq!(outcome.stats.errors, 1);
    assert_eq!(outcome.stats.success, 2);
    assert!(outcome
        .records
        .iter()
        .all(|r| r.time().format("%H:%M").to_string() != "01:00"));
    assert!(outcome.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_loop_error_returns_partial_data_and_keeps_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(50);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    // 두 번째 시점 이후 다음 시각 계산에서 범위 초과
    let end = NaiveDateTime::MAX;
    let start = end - TimeDelta::days(400);
    let outcome = runner.run(start, end, IntervalKind::Year, Duration::ZERO).await;

    assert_eq!(provider.calls(), 2);
    assert_eq!(outcome.records.len(), 100);
    assert!(!outcome.is_complete());
    assert!(files_with_extension(dir.path(), "csv").is_empty());

    assert_eq!(outcome.leftover_checkpoints.len(), 1);
    let checkpoint = &outcome.leftover_checkpoints[0];
    assert!(checkpoint.exists());
    let saved: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(checkpoint).unwrap()).unwrap();
    assert_eq!(saved.len(), 100);
    assert_eq!(saved[99]["순위"], 50);
}

#[tokio::test(start_paused = true)]
async fn test_checkpoint_holds_whole_accumulator_at_each_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::failing(100, vec![1]);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    // 시점 3개 (두 번째는 실패) 후 다음 시각 계산에서 범위 초과
    let end = NaiveDateTime::MAX - TimeDelta::hours(1);
    let start = end - TimeDelta::days(60);
    let outcome = runner.run(start, end, IntervalKind::Month, Duration::ZERO).await;

    assert_eq!(provider.calls(), 3);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.records.len(), 200);

    // 실패한 시점도 누적 수가 100의 배수이므로 저장됨
    let sizes: Vec<usize> = outcome
        .leftover_checkpoints
        .iter()
        .map(|path| {
            let saved: Vec<serde_json::Value> =
                serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            saved.len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 200]);
    assert_eq!(files_with_extension(dir.path(), "json").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_checkpoint_write_failure_does_not_abort_run() {
    let dir = tempfile::tempdir().unwrap();
    // 첫 체크포인트 경로를 디렉토리로 막아 저장 실패 유도
    let blocked = dir.path().join("chart_data_20240101_0000.json");
    std::fs::create_dir(&blocked).unwrap();

    let provider = ScriptedProvider::new(100);
    let runner = PeriodRunner::new(provider.clone(), config_for(dir.path()));

    let outcome = runner
        .run(
            dt(2024, 1, 1, 0, 0),
            dt(2024, 1, 1, 1, 0),
            IntervalKind::Hour,
            Duration::ZERO,
        )
        .await;

    assert_eq!(provider.calls(), 2);
    assert_eq!(outcome.records.len(), 200);
    assert!(outcome.is_complete());
    // 실패한 저장은 집계하지 않음
    assert_eq!(outcome.stats.checkpoints, 1);
    assert!(outcome.leftover_checkpoints.is_empty());
    assert!(blocked.is_dir());

    let csv_files = files_with_extension(dir.path(), "csv");
    assert_eq!(csv_files.len(), 1);
    assert_eq!(outcome.export_path.as_deref(), Some(csv_files[0].as_path()));
    let text = std::fs::read_to_string(&csv_files[0]).unwrap();
    assert_eq!(text.lines().count(), 1 + 200);
}

#[tokio::test(start_paused = true)]
async fn test_export_failure_keeps_checkpoints() {
    let dir = tempfile::tempdir().unwrap();
    // CSV 경로를 디렉토리로 막아 내보내기 실패 유도
    let blocked = dir.path().join("chart_data_20240101_20240101.csv");
    std::fs::create_dir(&blocked).unwrap();

    let runner = PeriodRunner::new(ScriptedProvider::new(100), config_for(dir.path()));

    let outcome = runner
        .run(
            dt(2024, 1, 1, 0, 0),
            dt(2024, 1, 1, 1, 0),
            IntervalKind::Hour,
            Duration::ZERO,
        )
        .await;

    assert!(outcome.export_path.is_none());
    assert!(!outcome.is_complete());
    assert_eq!(outcome.records.len(), 200);
    assert_eq!(outcome.stats.checkpoints, 2);
    assert!(blocked.is_dir());

    assert_eq!(outcome.leftover_checkpoints.len(), 2);
    assert!(outcome.leftover_checkpoints.iter().all(|p| p.is_file()));
    assert_eq!(
        files_with_extension(dir.path(), "json"),
        outcome.leftover_checkpoints
    );
}
