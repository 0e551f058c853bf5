use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

// Required logical schema, shared by all storage formats.
pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

/// Schema violations caught before a dataset ever reaches the views.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {problem}")]
    BadCell { row: usize, problem: String },
}

fn bad_cell(row: usize, problem: impl Into<String>) -> LoadError {
    LoadError::BadCell {
        row,
        problem: problem.into(),
    }
}

/// Validate one parsed row and turn it into a record.
fn build_record(
    row: usize,
    site: String,
    payload_mass_kg: f64,
    booster_category: String,
    class: i64,
) -> Result<LaunchRecord, LoadError> {
    if site.is_empty() {
        return Err(bad_cell(row, format!("empty '{COL_SITE}'")));
    }
    if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
        return Err(bad_cell(
            row,
            format!("'{COL_PAYLOAD}' must be a non-negative number, got {payload_mass_kg}"),
        ));
    }
    let outcome = Outcome::from_class(class)
        .ok_or_else(|| bad_cell(row, format!("'{COL_CLASS}' must be 0 or 1, got {class}")))?;

    Ok(LaunchRecord {
        site,
        payload_mass_kg,
        booster_category,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch-record dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four required columns
/// * `.json`    – records-oriented array of objects with the same keys
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming the four required columns (extra columns
/// are ignored), one launch per row.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader; split out so tests can feed in-memory data.
pub fn read_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let site_idx = column(COL_SITE)?;
    let payload_idx = column(COL_PAYLOAD)?;
    let booster_idx = column(COL_BOOSTER)?;
    let class_idx = column(COL_CLASS)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
        let payload: f64 = cell(payload_idx)
            .parse()
            .map_err(|_| bad_cell(row_no, format!("'{COL_PAYLOAD}' is not a number")))?;
        let class: i64 = cell(class_idx)
            .parse()
            .map_err(|_| bad_cell(row_no, format!("'{COL_CLASS}' is not an integer")))?;

        records.push(build_record(
            row_no,
            cell(site_idx).to_string(),
            payload,
            cell(booster_idx).to_string(),
            class,
        )?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 2500.0,
///     "Booster Version Category": "v1.1",
///     "class": 1
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

/// Parse records-oriented JSON text; split out so tests can feed strings.
pub fn read_json(text: &str) -> Result<LaunchDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (row_no, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {row_no} is not a JSON object"))?;

        let field = |name: &'static str| -> Result<&JsonValue, LoadError> {
            obj.get(name).ok_or(LoadError::MissingColumn(name))
        };

        let site = field(COL_SITE)?
            .as_str()
            .ok_or_else(|| bad_cell(row_no, format!("'{COL_SITE}' is not a string")))?;
        let payload = field(COL_PAYLOAD)?
            .as_f64()
            .ok_or_else(|| bad_cell(row_no, format!("'{COL_PAYLOAD}' is not a number")))?;
        let booster = field(COL_BOOSTER)?
            .as_str()
            .ok_or_else(|| bad_cell(row_no, format!("'{COL_BOOSTER}' is not a string")))?;
        let class = field(COL_CLASS)?
            .as_i64()
            .ok_or_else(|| bad_cell(row_no, format!("'{COL_CLASS}' is not an integer")))?;

        records.push(build_record(
            row_no,
            site.to_string(),
            payload,
            booster.to_string(),
            class,
        )?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Expected schema: flat columns named as the CSV headers; `Launch Site` and
/// `Booster Version Category` as Utf8/LargeUtf8, `Payload Mass (kg)` as any
/// float or integer type, `class` as any integer type.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| -> Result<Arc<dyn Array>, LoadError> {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| LoadError::MissingColumn(name))
        };
        let site_col = column(COL_SITE)?;
        let payload_col = column(COL_PAYLOAD)?;
        let booster_col = column(COL_BOOSTER)?;
        let class_col = column(COL_CLASS)?;

        for row in 0..batch.num_rows() {
            let row_no = row_base + row;
            let site = extract_string(&site_col, row)
                .ok_or_else(|| bad_cell(row_no, format!("'{COL_SITE}' is not a string")))?;
            let payload = extract_f64(&payload_col, row)
                .ok_or_else(|| bad_cell(row_no, format!("'{COL_PAYLOAD}' is not a number")))?;
            let booster = extract_string(&booster_col, row)
                .ok_or_else(|| bad_cell(row_no, format!("'{COL_BOOSTER}' is not a string")))?;
            let class = extract_i64(&class_col, row)
                .ok_or_else(|| bad_cell(row_no, format!("'{COL_CLASS}' is not an integer")))?;

            records.push(build_record(row_no, site, payload, booster, class)?);
        }
        row_base += batch.num_rows();
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        _ => None,
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| i64::from(a.value(row))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_OK: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version Category
1,CCAFS LC-40,0,0,v1.0
2,CCAFS LC-40,1,525,v1.0
3,KSC LC-39A,1,4696,FT
";

    #[test]
    fn test_read_csv() {
        let ds = read_csv(CSV_OK.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1].site, "CCAFS LC-40");
        assert_eq!(ds.records[1].payload_mass_kg, 525.0);
        assert_eq!(ds.records[2].booster_category, "FT");
        assert!(ds.records[2].outcome.is_success());
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "KSC LC-39A"]);
    }

    #[test]
    fn test_csv_missing_column_fails() {
        let csv = "Launch Site,class\nCCAFS LC-40,1\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(load_err, LoadError::MissingColumn(COL_PAYLOAD)));
    }

    #[test]
    fn test_csv_rejects_bad_class() {
        let csv = "\
Launch Site,class,Payload Mass (kg),Booster Version Category
CCAFS LC-40,2,100,v1.0
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::BadCell { row: 0, .. })
        ));
    }

    #[test]
    fn test_csv_rejects_negative_payload() {
        let csv = "\
Launch Site,class,Payload Mass (kg),Booster Version Category
CCAFS LC-40,1,-5,v1.0
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_json() {
        let text = r#"[
            {"Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 500.0,
             "Booster Version Category": "v1.0", "class": 1},
            {"Launch Site": "VAFB SLC-4E", "Payload Mass (kg)": 3000.0,
             "Booster Version Category": "FT", "class": 0}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].payload_mass_kg, 500.0);
        assert!(!ds.records[1].outcome.is_success());
    }

    #[test]
    fn test_json_missing_field_fails() {
        let text = r#"[{"Launch Site": "CCAFS LC-40", "class": 1}]"#;
        let err = read_json(text).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_unknown_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(_))
        ));
    }
}
