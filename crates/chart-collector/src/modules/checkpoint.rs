//! 중간 데이터(체크포인트) 관리 모듈.
//!
//! 장시간 수집 중 프로세스가 중단되어도 누적 데이터가 남도록
//! 누적 레코드 전체를 JSON 파일로 저장합니다.
//!
//! # 파일 형식
//!
//! - 이름: `<prefix>_<YYYYMMDD_HHMM>.json` (해당 수집 시각 기준)
//! - 내용: 한글 키를 가진 레코드 객체 배열 (UTF-8, 들여쓰기 2칸)
//!
//! 수집이 정상 완료되면 이번 실행에서 저장한 체크포인트를 모두 삭제합니다.

use crate::{ChartRecord, Result};
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// 한 번의 수집 실행 동안 저장한 체크포인트 목록
#[derive(Debug)]
pub struct CheckpointStore {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            written: Vec::new(),
        }
    }

    /// 수집 시각에 해당하는 체크포인트 경로
    pub fn path_for(&self, at: NaiveDateTime) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", self.prefix, at.format("%Y%m%d_%H%M")))
    }

    /// 누적 레코드 전체를 체크포인트로 저장
    pub fn save(&mut self, records: &[ChartRecord], at: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(at);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;

        if !self.written.contains(&path) {
            self.written.push(path.clone());
        }

        Ok(path)
    }

    /// 이번 실행에서 저장한 체크포인트 경로
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// 저장한 체크포인트 삭제 (실패는 로그만 남김)
    ///
    /// # Returns
    /// 삭제에 성공한 파일 수
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;

        for path in self.written.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "체크포인트 삭제 실패");
                }
            }
        }

        removed
    }
}
