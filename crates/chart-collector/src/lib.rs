//! 차트 히스토리 수집기.
//!
//! 지정한 기간을 일정 간격(년/월/일/시간)으로 순회하며 차트 스냅샷을 수집합니다:
//! - 차트 수집 (Provider 호출 → `ChartRecord` 변환)
//! - 중간 저장 (레코드 100개 단위 JSON 체크포인트)
//! - 최종 내보내기 (UTF-8 BOM CSV) 및 체크포인트 정리

pub mod config;
pub mod error;
pub mod modules;
pub mod period;
pub mod record;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use period::{expected_ticks, parse_datetime, IntervalKind};
pub use record::{ChartRecord, RankDelta};
pub use stats::CollectionStats;
