//! 환경변수 기반 설정 모듈.

use crate::{CollectorError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 차트 Provider 설정
    pub chart: ChartSourceConfig,
    /// 파일 출력 설정
    pub output: OutputConfig,
}

/// 차트 Provider 설정
#[derive(Debug, Clone)]
pub struct ChartSourceConfig {
    /// 멜론 API 기본 URL
    pub base_url: String,
    /// 앨범 이미지 크기 (픽셀)
    pub image_size: u32,
    /// 수집 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

/// 파일 출력 설정
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// 체크포인트/CSV 저장 디렉토리
    pub dir: PathBuf,
    /// 파일명 접두어
    pub file_prefix: String,
    /// 체크포인트 저장 단위 (누적 레코드 수, 0이면 저장 안 함)
    pub checkpoint_every: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            chart: ChartSourceConfig {
                base_url: chart_data::provider::melon::DEFAULT_BASE_URL.to_string(),
                image_size: 256,
                request_delay_ms: 2000,
            },
            output: OutputConfig {
                dir: PathBuf::from("."),
                file_prefix: "chart_data".to_string(),
                checkpoint_every: 100,
            },
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let image_size = env_var_parse("CHART_IMAGE_SIZE", defaults.chart.image_size);
        if image_size == 0 {
            return Err(CollectorError::Config(
                "CHART_IMAGE_SIZE는 0보다 커야 합니다".to_string(),
            ));
        }

        let file_prefix =
            std::env::var("CHART_FILE_PREFIX").unwrap_or(defaults.output.file_prefix);
        if file_prefix.trim().is_empty() {
            return Err(CollectorError::Config(
                "CHART_FILE_PREFIX가 비어 있습니다".to_string(),
            ));
        }

        Ok(Self {
            chart: ChartSourceConfig {
                base_url: std::env::var("MELON_API_BASE_URL").unwrap_or(defaults.chart.base_url),
                image_size,
                request_delay_ms: env_var_parse(
                    "CHART_REQUEST_DELAY_MS",
                    defaults.chart.request_delay_ms,
                ),
            },
            output: OutputConfig {
                dir: std::env::var("CHART_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output.dir),
                file_prefix,
                checkpoint_every: env_var_parse(
                    "CHART_CHECKPOINT_EVERY",
                    defaults.output.checkpoint_every,
                ),
            },
        })
    }
}

impl ChartSourceConfig {
    /// 수집 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
