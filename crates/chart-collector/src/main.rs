//! 차트 히스토리 수집 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 2024-01-01 00시부터 02시까지 1시간 간격 수집
//! chart-collector collect -f "2024-01-01 00:00" -t "2024-01-01 02:00" -i hour --yes
//!
//! # 인자 없이 실행하면 시작/종료 시각, 간격, 실행 여부를 차례로 묻습니다
//! chart-collector collect
//! ```

use anyhow::{bail, Context, Result};
use chart_collector::modules::PeriodRunner;
use chart_collector::{expected_ticks, parse_datetime, CollectorConfig, IntervalKind};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Select, Text};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chart-collector")]
#[command(about = "멜론 차트 기간별 수집기", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 기간별 차트 수집 (JSON 중간 저장 → CSV 내보내기)
    Collect {
        /// 시작 시각 (YYYY-MM-DD HH:MM)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 시각 (YYYY-MM-DD HH:MM)
        #[arg(short, long)]
        to: Option<String>,

        /// 수집 간격 (year, month, day, hour)
        #[arg(short, long)]
        interval: Option<String>,

        /// 수집 간 딜레이 (밀리초, 기본: CHART_REQUEST_DELAY_MS)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// 출력 디렉토리 (기본: CHART_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// 확인 없이 바로 실행
        #[arg(short, long, default_value = "false")]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "chart_collector={level},chart_data={level}",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = CollectorConfig::from_env()?;

    match cli.command {
        Commands::Collect {
            from,
            to,
            interval,
            delay_ms,
            output_dir,
            yes,
        } => {
            if let Some(ms) = delay_ms {
                config.chart.request_delay_ms = ms;
            }
            if let Some(dir) = output_dir {
                config.output.dir = PathBuf::from(dir);
            }

            let start = resolve_datetime(from, "시작 시각 (YYYY-MM-DD HH:MM):")?;
            let end = resolve_datetime(to, "종료 시각 (YYYY-MM-DD HH:MM):")?;
            if end < start {
                bail!("종료 시각({})이 시작 시각({})보다 앞섭니다", end, start);
            }
            let interval = resolve_interval(interval)?;
            let delay = config.chart.request_delay();

            println!("\n수집 기간: {} ~ {}", start, end);
            println!("수집 간격: {}", interval);
            println!("수집 횟수: {}", expected_ticks(start, end, interval));
            println!("저장 위치: {}", config.output.dir.display());

            if !yes {
                let proceed = Confirm::new("수집을 시작할까요?")
                    .with_default(false)
                    .prompt()
                    .context("입력 취소")?;
                if !proceed {
                    println!("수집을 취소했습니다.");
                    return Ok(());
                }
            }

            tracing::debug!(config = ?config, "설정 로드 완료");

            let runner = PeriodRunner::melon(config)?.with_progress(true);
            let outcome = runner.run(start, end, interval, delay).await;
            outcome.stats.log_summary("차트 수집");

            match outcome.export_path {
                Some(path) => {
                    println!("\n차트 수집 완료: {} 건", outcome.records.len());
                    println!("저장 위치: {}", path.display());
                }
                None => {
                    for path in &outcome.leftover_checkpoints {
                        println!("남은 중간 데이터: {}", path.display());
                    }
                    bail!(
                        "수집이 중단되었습니다 ({} 건 수집됨)",
                        outcome.records.len()
                    );
                }
            }
        }
    }

    Ok(())
}

/// 인자가 없으면 프롬프트로 날짜/시각 입력
fn resolve_datetime(arg: Option<String>, message: &str) -> Result<NaiveDateTime> {
    let raw = match arg {
        Some(value) => value,
        None => Text::new(message)
            .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
                Ok(match parse_datetime(input) {
                    Some(_) => Validation::Valid,
                    None => Validation::Invalid("형식: YYYY-MM-DD HH:MM".into()),
                })
            })
            .prompt()
            .context("입력 취소")?,
    };

    parse_datetime(&raw)
        .with_context(|| format!("잘못된 날짜 형식: {}. 예: 2024-01-01 13:00", raw))
}

/// 인자가 없으면 프롬프트로 간격 선택
fn resolve_interval(arg: Option<String>) -> Result<IntervalKind> {
    match arg {
        Some(value) => IntervalKind::parse(&value).with_context(|| {
            format!(
                "잘못된 간격: {}. 지원: year, month, day, hour",
                value
            )
        }),
        None => Select::new("수집 간격:", IntervalKind::ALL.to_vec())
            .with_starting_cursor(3)
            .prompt()
            .context("입력 취소"),
    }
}
