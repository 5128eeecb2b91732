//! 정규화된 차트 레코드.
//!
//! JSON 체크포인트와 CSV 모두 한글 컬럼명을 사용합니다:
//! 날짜, 시간, 순위, 제목, 아티스트, 이전순위, 신곡여부, 앨범이미지, 순위변동

use chart_data::ChartEntry;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 순위 변동 (이전 순위 - 현재 순위, 양수면 상승)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDelta {
    /// 순위 변동 폭
    Change(i64),
    /// 신규 진입
    New,
}

impl RankDelta {
    /// 신규 진입 표시 문자열
    pub const NEW_MARKER: &'static str = "NEW";

    /// 차트 항목에서 순위 변동 계산
    pub fn compute(rank: i64, previous_rank: i64, is_new: bool) -> Self {
        if is_new {
            Self::New
        } else {
            Self::Change(previous_rank - rank)
        }
    }
}

impl fmt::Display for RankDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(delta) => write!(f, "{}", delta),
            Self::New => write!(f, "{}", Self::NEW_MARKER),
        }
    }
}

impl Serialize for RankDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Change(delta) => serializer.serialize_i64(*delta),
            Self::New => serializer.serialize_str(Self::NEW_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for RankDelta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(delta) => Ok(Self::Change(delta)),
            Raw::Text(text) if text == Self::NEW_MARKER => Ok(Self::New),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map(Self::Change)
                .map_err(|_| serde::de::Error::custom(format!("invalid rank delta: {}", text))),
        }
    }
}

/// 특정 시점의 차트 항목 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    #[serde(rename = "날짜", with = "date_format")]
    date: NaiveDate,
    #[serde(rename = "시간", with = "time_format")]
    time: NaiveTime,
    #[serde(rename = "순위")]
    rank: i64,
    #[serde(rename = "제목")]
    title: String,
    #[serde(rename = "아티스트")]
    artist: String,
    #[serde(rename = "이전순위")]
    previous_rank: i64,
    #[serde(rename = "신곡여부")]
    is_new: bool,
    #[serde(rename = "앨범이미지")]
    image: String,
    #[serde(rename = "순위변동")]
    rank_delta: RankDelta,
}

impl ChartRecord {
    /// CSV/JSON 컬럼 순서
    pub const COLUMNS: [&'static str; 9] = [
        "날짜",
        "시간",
        "순위",
        "제목",
        "아티스트",
        "이전순위",
        "신곡여부",
        "앨범이미지",
        "순위변동",
    ];

    /// Provider 항목을 요청 시각 기준 레코드로 변환
    pub fn from_entry(entry: &ChartEntry, at: NaiveDateTime) -> Self {
        Self {
            date: at.date(),
            time: at.time(),
            rank: entry.rank,
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            previous_rank: entry.last_pos,
            is_new: entry.is_new,
            image: entry.image.clone(),
            rank_delta: RankDelta::compute(entry.rank, entry.last_pos, entry.is_new),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn rank(&self) -> i64 {
        self.rank
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn previous_rank(&self) -> i64 {
        self.previous_rank
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn rank_delta(&self) -> RankDelta {
        self.rank_delta
    }
}

/// 날짜 직렬화 (YYYYMMDD)
mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// 시각 직렬화 (HH:MM)
mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
