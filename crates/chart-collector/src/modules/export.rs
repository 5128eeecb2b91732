//! 최종 CSV 내보내기 모듈.

use crate::{ChartRecord, Result};
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// UTF-8 BOM (Excel 한글 호환)
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 기간 기준 내보내기 경로: `<prefix>_<startYYYYMMDD>_<endYYYYMMDD>.csv`
pub fn export_path(
    dir: &Path,
    prefix: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.csv",
        prefix,
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    ))
}

/// 레코드 전체를 CSV로 저장 (UTF-8 BOM, 헤더 포함, 인덱스 컬럼 없음)
pub fn export_csv(path: &Path, records: &[ChartRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    // 레코드가 없어도 헤더는 기록
    writer.write_record(ChartRecord::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), records = records.len(), "CSV 저장 완료");

    Ok(())
}
