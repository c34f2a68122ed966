//! Delimited text (CSV) dataset files.
//!
//! Reading decodes the raw bytes first (explicit encoding, or
//! `utf-8-sig` → `utf-8` → `latin-1`), then picks a separator (explicit, or
//! sniffed from the first lines) and hands the text to the `csv` parser.
//! Writing always produces UTF-8 with `,` separators.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::Table;
use crate::error::{DatasetError, Result};
use crate::port::outbound::dataset::{ReadOptions, TableSink, TableSource};

/// Separators considered when none is given.
const CANDIDATE_SEPARATORS: [char; 4] = [',', ';', '\t', '|'];

/// Lines inspected when sniffing the separator.
const SNIFF_LINES: usize = 20;

/// Separator used for output files.
const OUTPUT_SEPARATOR: u8 = b',';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8Sig,
    Utf8,
    Latin1,
}

impl Encoding {
    fn parse(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8-sig" | "utf8-sig" => Ok(Self::Utf8Sig),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(DatasetError::UnsupportedEncoding(name.to_string()).into()),
        }
    }

    /// Decode `bytes`, or `None` when they are not valid in this encoding.
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8(body.to_vec()).ok()
            }
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode with the requested encoding, or the first of the fallbacks that
/// accepts the bytes.
fn decode(bytes: &[u8], requested: Option<&str>) -> Result<String> {
    let candidates = match requested {
        Some(name) => vec![Encoding::parse(name)?],
        None => vec![Encoding::Utf8Sig, Encoding::Utf8, Encoding::Latin1],
    };

    for encoding in &candidates {
        if let Some(text) = encoding.decode(bytes) {
            debug!(?encoding, "Dataset decoded");
            return Ok(text);
        }
    }

    Err(DatasetError::Unreadable {
        separator: None,
        reason: format!("bytes are not valid {:?}", candidates[0]),
    }
    .into())
}

/// Occurrences of `separator` outside double quotes.
fn count_unquoted(line: &str, separator: char) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for c in line.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if c == separator && !quoted {
            count += 1;
        }
    }
    count
}

/// Guess the separator from the first lines of `text`.
///
/// Prefers the candidate splitting every sampled line into the same number
/// of fields, then the one with most fields in the header. Falls back to
/// `,` when no candidate appears at all.
fn sniff_separator(text: &str) -> char {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = sample.first() else {
        return ',';
    };

    let mut best: Option<(bool, usize, char)> = None;
    for separator in CANDIDATE_SEPARATORS {
        let fields = count_unquoted(header, separator);
        if fields == 0 {
            continue;
        }
        let consistent = sample
            .iter()
            .all(|line| count_unquoted(line, separator) == fields);
        let score = (consistent, fields, separator);
        if best.map_or(true, |(c, f, _)| (consistent, fields) > (c, f)) {
            best = Some(score);
        }
    }

    best.map_or(',', |(_, _, separator)| separator)
}

fn separator_byte(separator: char) -> Result<u8> {
    u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            DatasetError::Unreadable {
                separator: Some(separator),
                reason: "separator must be a single ASCII character".into(),
            }
            .into()
        })
}

fn parse(text: &str, separator: char) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator_byte(separator)?)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let unreadable = |e: csv::Error| DatasetError::Unreadable {
        separator: Some(separator),
        reason: e.to_string(),
    };

    let columns: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .map(ToString::to_string)
        .collect();

    // Short records are padded later; long ones would lose cells.
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(unreadable)?;
        if record.len() > columns.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(DatasetError::Unreadable {
                separator: Some(separator),
                reason: format!(
                    "line {line}: expected {} fields, saw {}",
                    columns.len(),
                    record.len()
                ),
            }
            .into());
        }
        rows.push(record.iter().map(ToString::to_string).collect::<Vec<_>>());
    }

    Ok(Table::from_text_rows(columns, rows))
}

/// Reads and writes CSV datasets on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDataset;

impl CsvDataset {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse already-decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Unreadable`] if the text is not valid CSV
    /// for the chosen separator.
    pub fn parse_text(&self, text: &str, separator: Option<char>) -> Result<Table> {
        if let Some(separator) = separator {
            return parse(text, separator);
        }

        let sniffed = sniff_separator(text);
        let table = parse(text, sniffed)?;

        // A lone column whose name still holds a separator means sniffing
        // picked wrong.
        if let [only] = table.columns() {
            for fallback in [';', ','] {
                if fallback != sniffed && only.contains(fallback) {
                    debug!(%fallback, "Retrying dataset with fallback separator");
                    return parse(text, fallback);
                }
            }
        }

        debug!(separator = %sniffed.escape_debug(), columns = table.columns().len(), "Dataset parsed");
        Ok(table)
    }
}

impl TableSource for CsvDataset {
    fn load(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        if !path.is_file() {
            return Err(DatasetError::NotFound(path.display().to_string()).into());
        }

        let bytes = fs::read(path)?;
        let text = decode(&bytes, options.encoding.as_deref())?;
        let table = self.parse_text(&text, options.separator)?;

        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns().len(),
            "Dataset loaded"
        );
        Ok(table)
    }
}

impl TableSink for CsvDataset {
    fn write(&self, path: &Path, table: &Table) -> Result<()> {
        let failed = |e: &dyn std::fmt::Display| DatasetError::Write(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| failed(&e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(OUTPUT_SEPARATOR)
            .from_path(path)
            .map_err(|e| failed(&e))?;

        writer.write_record(table.columns()).map_err(|e| failed(&e))?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))
                .map_err(|e| failed(&e))?;
        }
        writer.flush().map_err(|e| failed(&e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn load_bytes(bytes: &[u8], options: &ReadOptions) -> Result<Table> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.csv");
        fs::write(&path, bytes).unwrap();
        CsvDataset::new().load(&path, options)
    }

    #[test]
    fn sniffs_semicolon_separator() {
        let table = load_bytes(
            b"id;texto;canal\n1;Cobranca em dobro;email\n2;Sem acesso;chat\n",
            &ReadOptions::default(),
        )
        .unwrap();

        assert_eq!(table.columns(), ["id", "texto", "canal"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "texto"), Some("Sem acesso"));
    }

    #[test]
    fn sniffs_tab_and_pipe_separators() {
        let tab = load_bytes(b"a\tb\n1\t2\n", &ReadOptions::default()).unwrap();
        assert_eq!(tab.columns(), ["a", "b"]);

        let pipe = load_bytes(b"a|b|c\n1|2|3\n", &ReadOptions::default()).unwrap();
        assert_eq!(pipe.get(0, "c"), Some("3"));
    }

    #[test]
    fn commas_inside_quotes_do_not_confuse_sniffing() {
        let table = load_bytes(
            b"id;text\n1;\"Hello, world, again\"\n2;\"x, y\"\n",
            &ReadOptions::default(),
        )
        .unwrap();
        assert_eq!(table.get(0, "text"), Some("Hello, world, again"));
    }

    #[test]
    fn explicit_separator_wins() {
        let options = ReadOptions {
            separator: Some(';'),
            encoding: None,
        };
        let table = load_bytes(b"a,b;c\n1,2;3\n", &options).unwrap();
        assert_eq!(table.columns(), ["a,b", "c"]);
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("id,texto\n1,ação\n".as_bytes());

        let table = load_bytes(&bytes, &ReadOptions::default()).unwrap();
        assert_eq!(table.columns()[0], "id");
        assert_eq!(table.get(0, "texto"), Some("ação"));
    }

    #[test]
    fn falls_back_to_latin1() {
        // "ação" in latin-1
        let bytes = b"id,texto\n1,a\xe7\xe3o\n";
        let table = load_bytes(bytes, &ReadOptions::default()).unwrap();
        assert_eq!(table.get(0, "texto"), Some("ação"));
    }

    #[test]
    fn explicit_utf8_rejects_latin1_bytes() {
        let options = ReadOptions {
            separator: None,
            encoding: Some("utf-8".into()),
        };
        let err = load_bytes(b"id\n\xe7\n", &options).unwrap_err();
        assert!(matches!(err, Error::Dataset(DatasetError::Unreadable { .. })));
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let options = ReadOptions {
            separator: None,
            encoding: Some("ebcdic".into()),
        };
        let err = load_bytes(b"id\n1\n", &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Dataset(DatasetError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn placeholder_cells_become_missing() {
        let table = load_bytes(b"id,canal\n1,nan\n2,\n3,web\n", &ReadOptions::default()).unwrap();
        assert_eq!(table.get(0, "canal"), None);
        assert_eq!(table.get(1, "canal"), None);
        assert_eq!(table.get(2, "canal"), Some("web"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = CsvDataset::new()
            .load(Path::new("/no/such/file.csv"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Dataset(DatasetError::NotFound(_))));
    }

    #[test]
    fn single_column_file_stays_single_column() {
        let table = load_bytes(b"text\nhello\nworld\n", &ReadOptions::default()).unwrap();
        assert_eq!(table.columns(), ["text"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn writes_comma_separated_with_empty_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("result.csv");
        let table = Table::new(
            vec!["id".into(), "summary".into()],
            vec![
                vec![Some("1".into()), Some("Charged, twice".into())],
                vec![Some("2".into()), None],
            ],
        );

        CsvDataset::new().write(&path, &table).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "id,summary\n1,\"Charged, twice\"\n2,\n");
    }

    #[test]
    fn rows_wider_than_header_are_rejected() {
        let err = CsvDataset::new()
            .parse_text("id;text\n1;printer broke; again\n", Some(';'))
            .unwrap_err();
        match err {
            Error::Dataset(DatasetError::Unreadable { separator, reason }) => {
                assert_eq!(separator, Some(';'));
                assert!(reason.contains("line 2"), "{reason}");
                assert!(reason.contains("expected 2 fields, saw 3"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = CsvDataset::new()
            .parse_text("text\nmy printer, it broke\n", None)
            .unwrap_err();
        assert!(matches!(err, Error::Dataset(DatasetError::Unreadable { .. })));
    }

    #[test]
    fn rows_narrower_than_header_are_padded() {
        let table = CsvDataset::new()
            .parse_text("id,text,canal\n1,hello\n", Some(','))
            .unwrap();
        assert_eq!(table.get(0, "text"), Some("hello"));
        assert_eq!(table.get(0, "canal"), None);
    }

    #[test]
    fn sniffing_prefers_consistent_separator() {
        assert_eq!(sniff_separator("a;b;c\n1;2;3\n4;5;6"), ';');
        assert_eq!(sniff_separator("a,b\n1,2\n"), ',');
        assert_eq!(sniff_separator(""), ',');
    }
}
