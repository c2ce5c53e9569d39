//! Setup import and result export.
//!
//! Setups come in as CSV (`hex,label,weight,stock`) or as a JSON array of
//! records. Results go out as `timestamp,label,hex` CSV; the entry setup goes
//! out as pretty-printed JSON. A failed import returns an error and never
//! yields a partial list.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::batch::Batch;
use crate::entry::{clamp_count, normalize_hex, parse_count, EntrySetup};
use crate::history::{DrawHistory, DrawResult};

const DEFAULT_HEX: &str = "#ffffff";
const RESULTS_HEADER: &str = "timestamp,label,hex";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("setup JSON is not an array")]
    NotAnArray,
    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("line {line}: invalid color {value:?}")]
    InvalidRow { line: usize, value: String },
    #[error("nothing to export: {0}")]
    NothingToExport(&'static str),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Setup file format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFormat {
    Csv,
    Json,
}

impl SetupFormat {
    /// `.json` files are JSON, anything else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SetupFormat::Json,
            _ => SetupFormat::Csv,
        }
    }
}

/// What an export file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Results,
    Batch,
    Setup,
}

impl ExportKind {
    /// File name for an export made at the moment `tag` describes
    pub fn file_name(&self, tag: &str) -> String {
        match self {
            ExportKind::Results => format!("garagara_results_{tag}.csv"),
            ExportKind::Batch => format!("garagara_batch_{tag}.csv"),
            ExportKind::Setup => format!("garagara_setup_{tag}.json"),
        }
    }
}

pub fn import_setup(text: &str, format: SetupFormat) -> Result<Vec<EntrySetup>, TransferError> {
    match format {
        SetupFormat::Csv => import_csv(text),
        SetupFormat::Json => import_json(text),
    }
}

/// Parse `hex,label,weight,stock` rows.
///
/// Blank lines are ignored and a first row whose first column mentions `hex`
/// is treated as a header. Empty colors default to white; empty stock means
/// unlimited.
pub fn import_csv(text: &str) -> Result<Vec<EntrySetup>, TransferError> {
    let mut out = Vec::new();
    let rows = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    for (n, (line_no, line)) in rows.enumerate() {
        let cols: Vec<&str> = line.split(',').collect();
        if n == 0 && cols[0].to_ascii_lowercase().contains("hex") {
            continue;
        }

        let col = |i: usize| cols.get(i).map(|c| c.trim()).unwrap_or("");
        let hex = match col(0) {
            "" => DEFAULT_HEX.to_string(),
            raw => normalize_hex(raw).ok_or_else(|| TransferError::InvalidRow {
                line: line_no + 1,
                value: raw.to_string(),
            })?,
        };
        let label = unquote(col(1));
        let label = if label.is_empty() { hex.clone() } else { label };
        let stock = match col(3) {
            "" => None,
            raw => Some(parse_count(raw)),
        };

        out.push(EntrySetup {
            hex,
            label,
            weight: parse_count(col(2)),
            stock,
        });
    }

    tracing::debug!("Parsed {} CSV setup rows", out.len());
    Ok(out)
}

/// Strip one pair of surrounding double quotes and undo `""` escaping
fn unquote(field: &str) -> String {
    match field.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

/// Parse a JSON array of `{hex, label, weight, stock}` records.
///
/// Numbers may also be numeric strings. A `null`, empty or missing stock is
/// unlimited.
pub fn import_json(text: &str) -> Result<Vec<EntrySetup>, TransferError> {
    let Value::Array(records) = serde_json::from_str::<Value>(text)? else {
        return Err(TransferError::NotAnArray);
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let invalid = |reason: &str| TransferError::InvalidRecord {
                index,
                reason: reason.to_string(),
            };
            let Value::Object(fields) = record else {
                return Err(invalid("not an object"));
            };

            let hex = fields
                .get("hex")
                .and_then(Value::as_str)
                .and_then(normalize_hex)
                .ok_or_else(|| invalid("missing or invalid hex"))?;
            let label = fields.get("label").and_then(Value::as_str).unwrap_or("");
            let weight = fields.get("weight").map_or(0, json_count);
            let stock = match fields.get("stock") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.trim().is_empty() => None,
                Some(v) => Some(json_count(v)),
            };

            Ok(EntrySetup::new(hex, label, weight, stock))
        })
        .collect()
}

fn json_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_f64().map_or(0, clamp_count),
        Value::String(s) => parse_count(s),
        Value::Bool(b) => u32::from(*b),
        _ => 0,
    }
}

/// Pretty-printed JSON array of the entry setup
pub fn export_setup_json(setups: &[EntrySetup]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(setups)?)
}

/// Whole draw history as CSV, most recent first
pub fn results_csv(history: &DrawHistory) -> Result<String, TransferError> {
    if history.is_empty() {
        return Err(TransferError::NothingToExport("no results yet"));
    }
    Ok(csv_table(history.iter().map(|r| (r.time, r))))
}

/// The latest batch as CSV, every row stamped with the batch time
pub fn batch_csv(batch: &Batch) -> Result<String, TransferError> {
    let time = match batch.time() {
        Some(time) if !batch.is_empty() => time,
        _ => return Err(TransferError::NothingToExport("no batch draw yet")),
    };
    Ok(csv_table(batch.items().iter().map(|r| (time, r))))
}

fn csv_table<'a>(rows: impl Iterator<Item = (DateTime<Utc>, &'a DrawResult)>) -> String {
    let mut lines = vec![RESULTS_HEADER.to_string()];
    lines.extend(rows.map(|(time, result)| {
        format!(
            "{},\"{}\",{}",
            format_timestamp(time),
            result.label.replace('"', "\"\""),
            result.hex.to_uppercase()
        )
    }));
    lines.join("\r\n")
}

/// `2024-01-02T03:04:05.678Z`
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Local `YYYYMMDD_HHMMSS` used in export file names
pub fn date_tag(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Read and parse a setup file
pub async fn read_setup_file(path: &Path) -> Result<Vec<EntrySetup>, TransferError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let setups = import_setup(&text, SetupFormat::from_path(path))?;
    tracing::info!("Imported {} entries from {}", setups.len(), path.display());
    Ok(setups)
}

/// Write an export into `dir` under a timestamped name
pub async fn write_export(dir: &Path, kind: ExportKind, content: &str) -> Result<PathBuf, TransferError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| TransferError::Io { path, source }
    };

    tokio::fs::create_dir_all(dir).await.map_err(io_err(dir))?;
    let path = dir.join(kind.file_name(&date_tag(Local::now())));
    tokio::fs::write(&path, content).await.map_err(io_err(&path))?;

    tracing::info!("Exported {:?} to {}", kind, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{preset, Entry, EntryId};
    use chrono::TimeZone;

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000).unwrap()
    }

    #[test]
    fn test_csv_import_with_header() {
        let text = "hex,label,weight,stock\r\n#FF0000,Red,2,5\r\n\r\n#00f,  Blue ,1,\r\n";
        let setups = import_csv(text).unwrap();
        assert_eq!(setups.len(), 2);
        assert_eq!(
            setups[0],
            EntrySetup {
                hex: "#ff0000".into(),
                label: "Red".into(),
                weight: 2,
                stock: Some(5)
            }
        );
        assert_eq!(setups[1].hex, "#0000ff");
        assert_eq!(setups[1].label, "Blue");
        assert_eq!(setups[1].stock, None);
    }

    #[test]
    fn test_csv_import_defaults() {
        let setups = import_csv("#123456\n,,abc,-4\n").unwrap();
        assert_eq!(setups[0].label, "#123456");
        assert_eq!(setups[0].weight, 0);
        assert_eq!(setups[0].stock, None);
        assert_eq!(setups[1].hex, "#ffffff");
        assert_eq!(setups[1].weight, 0);
        assert_eq!(setups[1].stock, Some(0));
    }

    #[test]
    fn test_csv_import_bad_color() {
        let err = import_csv("#ff0000,Red,1,\nnope,X,1,\n").unwrap_err();
        assert!(matches!(err, TransferError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn test_json_import() {
        let text = r##"[
            {"hex": "#FF0000", "label": "Red", "weight": 3, "stock": null},
            {"hex": "0f0", "label": "Green", "weight": "2", "stock": "4"},
            {"hex": "#0000ff", "weight": 1.7, "stock": ""}
        ]"##;
        let setups = import_json(text).unwrap();
        assert_eq!(setups[0].weight, 3);
        assert_eq!(setups[0].stock, None);
        assert_eq!(setups[1].hex, "#00ff00");
        assert_eq!(setups[1].stock, Some(4));
        assert_eq!(setups[2].label, "#0000FF");
        assert_eq!(setups[2].weight, 1);
        assert_eq!(setups[2].stock, None);
    }

    #[test]
    fn test_json_import_errors() {
        assert!(matches!(import_json(r##"{"hex": "#fff"}"##), Err(TransferError::NotAnArray)));
        assert!(matches!(import_json("not json"), Err(TransferError::Json(_))));
        assert!(matches!(
            import_json(r##"[{"hex": "#fff"}, {"label": "no color"}]"##),
            Err(TransferError::InvalidRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_setup_json_round_trip() {
        let mut setups = preset();
        setups[0].weight = 4;
        setups[1].stock = Some(0);
        setups[2].stock = Some(12);
        setups[3].label = "Say \"yellow\"".into();

        let json = export_setup_json(&setups).unwrap();
        assert_eq!(import_json(&json).unwrap(), setups);
    }

    #[test]
    fn test_setup_json_shape() {
        let setups = vec![EntrySetup::new("#ff0000".to_string(), "Red", 2, None)];
        let json = export_setup_json(&setups).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{"hex": "#ff0000", "label": "Red", "weight": 2, "stock": null}])
        );
    }

    #[test]
    fn test_results_csv() {
        let mut history = DrawHistory::new();
        assert!(matches!(results_csv(&history), Err(TransferError::NothingToExport(_))));

        history.record(DrawResult {
            time: at(0, 5),
            label: "Red".into(),
            hex: "#ff0000".into(),
        });
        history.record(DrawResult {
            time: at(1, 0),
            label: "Say \"hi\"".into(),
            hex: "#00ff00".into(),
        });

        let csv = results_csv(&history).unwrap();
        assert_eq!(
            csv,
            "timestamp,label,hex\r\n\
             1970-01-01T00:00:01.000Z,\"Say \"\"hi\"\"\",#00FF00\r\n\
             1970-01-01T00:00:00.005Z,\"Red\",#FF0000"
        );
    }

    #[test]
    fn test_batch_csv() {
        assert!(batch_csv(&Batch::default()).is_err());

        let pick = |label: &str| Entry {
            id: EntryId(0),
            hex: "#abcdef".into(),
            label: label.into(),
            weight: 1,
            stock: None,
        };
        let batch = Batch::from_picks(&[pick("A"), pick("B")], at(2, 250));
        let csv = batch_csv(&batch).unwrap();
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1970-01-01T00:00:02.250Z,\"A\",#ABCDEF");
        assert_eq!(lines[2], "1970-01-01T00:00:02.250Z,\"B\",#ABCDEF");
    }

    #[test]
    fn test_file_names() {
        let tag = date_tag(Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap());
        assert_eq!(tag, "20240309_070502");
        assert_eq!(ExportKind::Batch.file_name(&tag), "garagara_batch_20240309_070502.csv");
        assert_eq!(ExportKind::Setup.file_name(&tag), "garagara_setup_20240309_070502.json");
    }

    #[test]
    fn test_setup_format() {
        assert_eq!(SetupFormat::from_path(Path::new("a.JSON")), SetupFormat::Json);
        assert_eq!(SetupFormat::from_path(Path::new("a.csv")), SetupFormat::Csv);
        assert_eq!(SetupFormat::from_path(Path::new("noext")), SetupFormat::Csv);
    }

    #[tokio::test]
    async fn test_write_then_read_setup_file() {
        let dir = tempfile::tempdir().unwrap();
        let setups = preset();
        let json = export_setup_json(&setups).unwrap();

        let path = write_export(dir.path(), ExportKind::Setup, &json).await.unwrap();
        assert!(path.extension().is_some_and(|e| e == "json"));
        assert_eq!(read_setup_file(&path).await.unwrap(), setups);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_setup_file(Path::new("/definitely/not/here.csv")).await.unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }
}
