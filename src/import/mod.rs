//! Bulk import of cards from an uploaded CSV file.
//!
//! Uploads come from spreadsheets saved on Japanese Windows machines as
//! often as from anything else, so a few encodings are tried in turn before
//! giving up. The first column holds the card text unless a header row
//! names a `content` column.

mod dto;
pub mod handlers;

use encoding::{label::encoding_from_whatwg_label, types::DecoderTrap};
use tracing::debug;

use crate::{
    cards::repo_types::is_blank,
    error::{AppError, AppResult},
};

pub fn router() -> axum::Router<crate::state::AppState> {
    handlers::import_routes()
}

/// Tried in order; the first that decodes cleanly wins. The WHATWG
/// `shift_jis` decoder already covers the Windows-31J (CP932) extensions.
pub const ENCODINGS: [&str; 2] = ["utf-8", "shift_jis"];

const CONTENT_HEADER: &str = "content";

#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub encoding: &'static str,
    pub entries: Vec<String>,
}

pub fn parse(raw: &[u8]) -> AppResult<ImportBatch> {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);

    for label in ENCODINGS {
        let Some(encoding) = encoding_from_whatwg_label(label) else {
            continue;
        };
        let text = match encoding.decode(raw, DecoderTrap::Strict) {
            Ok(text) => text,
            Err(e) => {
                debug!(label, error = %e, "decode attempt failed");
                continue;
            }
        };
        match read_rows(&text) {
            Ok(rows) => {
                let entries = content_column(rows)?;
                debug!(label, count = entries.len(), "import parsed");
                return Ok(ImportBatch {
                    encoding: label,
                    entries,
                });
            }
            Err(e) => debug!(label, error = %e, "csv parse attempt failed"),
        }
    }

    Err(AppError::UnsupportedEncoding(ENCODINGS.join(", ")))
}

fn read_rows(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect()))
        .collect()
}

fn content_column(rows: Vec<Vec<String>>) -> AppResult<Vec<String>> {
    let mut rows = rows.into_iter().peekable();
    let header_col = rows.peek().and_then(|first| {
        first
            .iter()
            .position(|cell| cell.trim().eq_ignore_ascii_case(CONTENT_HEADER))
    });
    let col = match header_col {
        Some(col) => {
            rows.next();
            col
        }
        None => 0,
    };

    let mut seen_column = false;
    let mut entries = Vec::new();
    for mut row in rows {
        if col < row.len() {
            seen_column = true;
            let cell = row.swap_remove(col);
            if !is_blank(&cell) {
                entries.push(cell);
            }
        }
    }

    if !seen_column {
        return Err(AppError::MissingColumn);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_column_in_file_order() {
        let batch = parse(b"one,x\ntwo,y\n\n  ,z\nthree\n").unwrap();
        assert_eq!(batch.encoding, "utf-8");
        assert_eq!(batch.entries, vec!["one", "two", "three"]);
    }

    #[test]
    fn named_content_column_wins() {
        let batch = parse(b"id,Content\n1,hello\n2,world\n3,\n").unwrap();
        assert_eq!(batch.entries, vec!["hello", "world"]);
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let batch = parse(b"\"a, b\"\n\"line1\nline2\"\n").unwrap();
        assert_eq!(batch.entries, vec!["a, b", "line1\nline2"]);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let batch = parse("\u{feff}content\nfirst\n".as_bytes()).unwrap();
        assert_eq!(batch.entries, vec!["first"]);
    }

    #[test]
    fn falls_back_to_shift_jis() {
        // "あい" and "う" in Shift_JIS
        let raw = [0x82, 0xA0, 0x82, 0xA2, b'\n', 0x82, 0xA4, b'\n'];
        let batch = parse(&raw).unwrap();
        assert_eq!(batch.encoding, "shift_jis");
        assert_eq!(batch.entries, vec!["あい", "う"]);
    }

    #[test]
    fn shift_jis_covers_windows_extensions() {
        // "①" (NEC row 13) and "髙" (IBM extension) only exist in Windows-31J
        let raw = [0x87, 0x40, b'\n', 0xFB, 0xFC, b'\n'];
        let batch = parse(&raw).unwrap();
        assert_eq!(batch.encoding, "shift_jis");
        assert_eq!(batch.entries, vec!["①", "髙"]);
    }

    #[test]
    fn undecodable_bytes_are_unsupported() {
        let err = parse(&[0xFD, 0xFE, 0xFF]).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedEncoding(_)));
    }

    #[test]
    fn empty_file_has_no_column() {
        assert!(matches!(parse(b"").unwrap_err(), AppError::MissingColumn));
        assert!(matches!(parse(b"content\n").unwrap_err(), AppError::MissingColumn));
    }

    #[test]
    fn header_column_missing_from_rows() {
        let err = parse(b"id,content\n1\n2\n").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn));
    }
}
