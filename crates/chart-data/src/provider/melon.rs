//! 멜론 차트 클라이언트.
//!
//! 멜론 모바일 앱이 사용하는 차트 JSON API에서 실시간 TOP 100을 가져옵니다.
//!
//! ## 응답 구조
//! ```json
//! {
//!   "response": {
//!     "RANKDAY": "2024.01.01",
//!     "RANKHOUR": "13:00",
//!     "SONGLIST": [
//!       {
//!         "CURRANK": "1", "PASTRANK": "2", "RANKTYPE": "UP",
//!         "SONGNAME": "...", "ALBUMIMG": ".../melon/resize/120/...",
//!         "ARTISTLIST": [{ "ARTISTNAME": "..." }]
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = MelonChartClient::new()?;
//! let chart = client.fetch_chart(256).await?;
//! println!("1위: {}", chart.entries[0].title);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{ChartEntry, ChartProvider, ChartSnapshot};
use crate::{ChartError, Result};

/// 멜론 API 기본 URL
pub const DEFAULT_BASE_URL: &str = "https://m2.melon.com";

const CHART_PATH: &str = "/m6/chart/ent/songChartList.json";
const CP_ID: &str = "AS40";
const CP_KEY: &str = "14LNC3";
const APP_VERSION: &str = "6.5.8.1";

/// 이미지 URL의 크기 지정 구간
const RESIZE_MARKER: &str = "/melon/resize/";

/// 신곡 표시 RANKTYPE 값
const RANK_TYPE_NEW: &str = "NEW";

#[derive(Debug, Deserialize)]
struct MelonChartResponse {
    response: Option<MelonChartBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct MelonChartBody {
    rankday: Option<String>,
    rankhour: Option<String>,
    songlist: Option<Vec<MelonSong>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct MelonSong {
    currank: Value,
    #[serde(default)]
    pastrank: Value,
    #[serde(default)]
    ranktype: Option<String>,
    songname: String,
    #[serde(default)]
    artistlist: Vec<MelonArtist>,
    #[serde(default)]
    albumimg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct MelonArtist {
    artistname: String,
}

/// 멜론 차트 클라이언트
pub struct MelonChartClient {
    client: Client,
    base_url: String,
}

impl MelonChartClient {
    /// 기본 URL로 생성
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// 커스텀 기본 URL로 생성 (테스트용 mock 서버 등)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}; Android 13; {}; sdk_gphone64_x86_64",
                CP_ID, APP_VERSION
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self) -> String {
        format!(
            "{}{}?cpId={}&cpKey={}&appVer={}",
            self.base_url, CHART_PATH, CP_ID, CP_KEY, APP_VERSION
        )
    }
}

#[async_trait]
impl ChartProvider for MelonChartClient {
    fn name(&self) -> &str {
        "melon"
    }

    async fn fetch_chart(&self, image_size: u32) -> Result<ChartSnapshot> {
        let url = self.chart_url();
        debug!(url = %url, "멜론 차트 요청");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChartError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "멜론 차트 응답 수신");

        parse_chart(&body, image_size)
    }
}

/// 차트 응답 JSON 파싱
fn parse_chart(body: &str, image_size: u32) -> Result<ChartSnapshot> {
    let parsed: MelonChartResponse = serde_json::from_str(body)?;

    let chart = parsed
        .response
        .ok_or_else(|| ChartError::MissingData("response".to_string()))?;
    let songs = chart
        .songlist
        .ok_or_else(|| ChartError::MissingData("SONGLIST".to_string()))?;

    let entries = songs
        .into_iter()
        .map(|song| parse_entry(song, image_size))
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartSnapshot {
        rank_day: chart.rankday,
        rank_hour: chart.rankhour,
        entries,
    })
}

fn parse_entry(song: MelonSong, image_size: u32) -> Result<ChartEntry> {
    let rank = parse_rank(&song.currank).ok_or_else(|| {
        ChartError::Parse(format!("잘못된 순위 값: {} ({})", song.currank, song.songname))
    })?;

    let artist = song
        .artistlist
        .iter()
        .map(|a| a.artistname.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(ChartEntry {
        rank,
        artist,
        // 신곡은 PASTRANK가 비어 있음
        last_pos: parse_rank(&song.pastrank).unwrap_or(0),
        is_new: song.ranktype.as_deref() == Some(RANK_TYPE_NEW),
        image: song
            .albumimg
            .map(|url| resize_image_url(&url, image_size))
            .unwrap_or_default(),
        title: song.songname,
    })
}

/// 순위 값 파싱 (문자열/숫자 모두 허용)
fn parse_rank(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        _ => None,
    }
}

/// 이미지 URL의 `/melon/resize/<n>` 값을 요청 크기로 교체
fn resize_image_url(url: &str, image_size: u32) -> String {
    let Some(pos) = url.find(RESIZE_MARKER) else {
        return url.to_string();
    };

    let digits_start = pos + RESIZE_MARKER.len();
    let digits_len = url[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    format!(
        "{}{}{}",
        &url[..digits_start],
        image_size,
        &url[digits_start + digits_len..]
    )
}
