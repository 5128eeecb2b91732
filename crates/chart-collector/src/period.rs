//! 수집 간격 및 기간 계산.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// 수집 간격 (고정 길이)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    /// 1년 (365일 고정)
    Year,
    /// 1개월 (30일 고정)
    Month,
    /// 1일
    Day,
    /// 1시간
    Hour,
}

impl IntervalKind {
    /// 전체 간격 목록 (선택 프롬프트 순서)
    pub const ALL: [IntervalKind; 4] = [Self::Year, Self::Month, Self::Day, Self::Hour];

    /// 문자열에서 간격 파싱
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "y" | "year" | "yearly" | "년" | "연" => Some(Self::Year),
            "2" | "m" | "month" | "monthly" | "월" => Some(Self::Month),
            "3" | "d" | "day" | "daily" | "일" => Some(Self::Day),
            "4" | "h" | "hour" | "hourly" | "시간" => Some(Self::Hour),
            _ => None,
        }
    }

    /// 간격 길이
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::Year => TimeDelta::days(365),
            Self::Month => TimeDelta::days(30),
            Self::Day => TimeDelta::days(1),
            Self::Hour => TimeDelta::hours(1),
        }
    }

    /// 한글 표시명
    pub fn label(&self) -> &'static str {
        match self {
            Self::Year => "년",
            Self::Month => "월",
            Self::Day => "일",
            Self::Hour => "시간",
        }
    }
}

impl std::fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year => write!(f, "year ({})", self.label()),
            Self::Month => write!(f, "month ({})", self.label()),
            Self::Day => write!(f, "day ({})", self.label()),
            Self::Hour => write!(f, "hour ({})", self.label()),
        }
    }
}

/// 기간 내 수집 시점 수: `floor((end - start) / interval) + 1`
///
/// `end < start`이면 0.
pub fn expected_ticks(start: NaiveDateTime, end: NaiveDateTime, interval: IntervalKind) -> u64 {
    if end < start {
        return 0;
    }

    let span = (end - start).num_seconds();
    let step = interval.duration().num_seconds();
    (span / step) as u64 + 1
}

/// 날짜/시각 문자열 파싱
///
/// 지원 형식: `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM`, `YYYYMMDDHH`, `YYYY-MM-DD` (00:00)
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if s.len() == 10 && s.chars().all(|c| c.is_ascii_digit()) {
        let date = NaiveDate::parse_from_str(&s[..8], "%Y%m%d").ok()?;
        let hour: u32 = s[8..].parse().ok()?;
        return date.and_hms_opt(hour, 0, 0);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
