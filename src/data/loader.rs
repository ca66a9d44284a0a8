use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Dataset;
use super::normalize::{LIFE_EXPECTANCY_COLUMNS, NormalizeReport, RawRow, SourceRow, normalize};

/// A normalized dataset together with the rows that were dropped on the way.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load observations from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `country`, `year`, `life-expectancy`
/// * `.json`    – `[{ "country": "...", "year": 1960, "life-expectancy": 52.1 }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<Loaded> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let (dataset, report) =
        normalize(rows).with_context(|| format!("normalizing {}", path.display()))?;
    log::info!(
        "Loaded {} countries ({} observations kept, {} dropped, years {}..={}) from {}",
        dataset.country_count(),
        report.kept,
        report.dropped.len(),
        dataset.year_extent().min,
        dataset.year_extent().max,
        path.display()
    );
    Ok(Loaded { dataset, report })
}

fn require_columns(names: &[&str], source: &str) -> Result<()> {
    for required in ["country", "year"] {
        if !names.contains(&required) {
            bail!("{source} missing '{required}' column");
        }
    }
    if !names.iter().any(|h| LIFE_EXPECTANCY_COLUMNS.contains(h)) {
        bail!("{source} missing 'life-expectancy' column");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read raw rows from CSV text. Extra columns are ignored.
///
/// Only a bad header or an I/O failure fails the read. A record with too few
/// fields or invalid UTF-8 comes back as [`SourceRow::Malformed`].
pub fn read_csv<R: Read>(input: R) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let names = reader.headers().context("reading CSV headers")?.clone();
    require_columns(&names.iter().collect::<Vec<_>>(), "CSV")?;
    let headers = reader.byte_headers().context("reading CSV headers")?.clone();

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("reading CSV row {}", rows.len()))?
    {
        let row = match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(raw) => SourceRow::Row(raw),
            Err(e) => SourceRow::Malformed(e.to_string()),
        };
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON. Numbers and strings are both accepted for every
/// field. A `null` or missing field becomes empty and the normalizer drops
/// the row; an element that is not an object is malformed.
pub fn read_json(text: &str) -> Result<Vec<SourceRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .map(|rec| {
            let Some(obj) = rec.as_object() else {
                return SourceRow::Malformed(format!("expected a JSON object, found {rec}"));
            };
            let field = |name: &str| obj.get(name).map(json_to_text).unwrap_or_default();
            let le_key = LIFE_EXPECTANCY_COLUMNS
                .iter()
                .find(|k| obj.contains_key(**k))
                .copied()
                .unwrap_or("life-expectancy");

            SourceRow::Row(RawRow {
                country: field("country"),
                year: field("year"),
                life_expectancy: field(le_key),
            })
        })
        .collect();
    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Expected schema: `country` (Utf8), `year` (Int32/Int64/Float/Utf8) and a
/// life-expectancy column (Float32/Float64/Utf8). Works with files written by
/// both Pandas and Polars.
fn read_parquet(path: &Path) -> Result<Vec<SourceRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        require_columns(&names, "Parquet file")?;

        let le_name = LIFE_EXPECTANCY_COLUMNS
            .iter()
            .find(|c| names.contains(*c))
            .copied()
            .unwrap_or("life-expectancy");

        let country_col = column(&batch, "country")?;
        let year_col = column(&batch, "year")?;
        let le_col = column(&batch, le_name)?;

        for row in 0..batch.num_rows() {
            rows.push(SourceRow::Row(RawRow {
                country: cell_text(country_col, row)
                    .with_context(|| format!("Row {row}: failed to read 'country'"))?,
                year: cell_text(year_col, row)
                    .with_context(|| format!("Row {row}: failed to read 'year'"))?,
                life_expectancy: cell_text(le_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{le_name}'"))?,
            }));
        }
    }

    Ok(rows)
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn downcast<T: 'static>(col: &ArrayRef) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Render a single cell as text so every format goes through the same
/// normalizer. Nulls become empty strings.
fn cell_text(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => downcast::<Int32Array>(col)?.value(row).to_string(),
        DataType::Int64 => downcast::<Int64Array>(col)?.value(row).to_string(),
        DataType::Float32 => downcast::<Float32Array>(col)?.value(row).to_string(),
        DataType::Float64 => downcast::<Float64Array>(col)?.value(row).to_string(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::normalize::IssueKind;

    fn row(country: &str, year: &str, le: &str) -> SourceRow {
        SourceRow::Row(RawRow::new(country, year, le))
    }

    #[test]
    fn csv_with_extra_columns_and_variant_header() {
        let text = "\
country,code,year,life_expectancy
Aruba, ABW ,1960,65.66
Aruba,ABW,1961,66.07
";
        let rows = read_csv(text.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![row("Aruba", "1960", "65.66"), row("Aruba", "1961", "66.07")]
        );
    }

    #[test]
    fn csv_missing_value_column_is_rejected() {
        let err = read_csv("country,year\nA,1960\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("life-expectancy"));
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let text = r#"[
            {"country": "A", "year": 1960, "life-expectancy": 50.5},
            {"country": "A", "year": "1970", "lifeExpectancy": "55"},
            {"country": "B", "year": null, "le": 40}
        ]"#;
        let rows = read_json(text).unwrap();
        assert_eq!(rows[0], row("A", "1960", "50.5"));
        assert_eq!(rows[1], row("A", "1970", "55"));
        assert_eq!(rows[2], row("B", "", "40"));
    }

    #[test]
    fn csv_short_record_is_dropped_not_fatal() {
        let text = "country,year,life-expectancy\nA,1960,50\nA,1970\nA,1980,60\n";
        let rows = read_csv(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], row("A", "1960", "50"));
        assert!(matches!(rows[1], SourceRow::Malformed(_)));
        assert_eq!(rows[2], row("A", "1980", "60"));

        let (ds, report) = normalize(rows).unwrap();
        assert_eq!(ds.get("A").unwrap().points.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].row, 1);
        assert!(matches!(report.dropped[0].kind, IssueKind::Malformed(_)));
    }

    #[test]
    fn csv_invalid_utf8_is_dropped_not_fatal() {
        let mut bytes = b"country,year,life-expectancy\nA,1960,50\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe,1970,55\n");
        let rows = read_csv(bytes.as_slice()).unwrap();
        assert_eq!(rows[0], row("A", "1960", "50"));
        assert!(matches!(rows[1], SourceRow::Malformed(_)));

        let (_, report) = normalize(rows).unwrap();
        assert_eq!(report.kept, 1);
        assert_eq!(report.dropped.len(), 1);
    }

    #[test]
    fn json_record_missing_fields_is_dropped_not_fatal() {
        let text = r#"[
            {"country": "A", "year": 1960, "life-expectancy": 50},
            {"country": "A", "life-expectancy": 55},
            {"year": 1970, "life-expectancy": 55},
            42
        ]"#;
        let rows = read_json(text).unwrap();
        assert_eq!(rows[1], row("A", "", "55"));
        assert_eq!(rows[2], row("", "1970", "55"));
        assert!(matches!(rows[3], SourceRow::Malformed(_)));

        let (ds, report) = normalize(rows).unwrap();
        assert_eq!(report.kept, 1);
        assert_eq!(ds.get("A").unwrap().points[0].life_expectancy, 50.0);
        let kinds: Vec<&IssueKind> = report.dropped.iter().map(|i| &i.kind).collect();
        assert_eq!(kinds[0], &IssueKind::BadYear(String::new()));
        assert_eq!(kinds[1], &IssueKind::EmptyCountry);
        assert!(matches!(kinds[2], IssueKind::Malformed(_)));
    }

    #[test]
    fn parquet_columns_load_and_null_values_are_dropped() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("year", DataType::Int64, false),
            Field::new("life_expectancy", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "A", "B"])),
                Arc::new(Int64Array::from(vec![1960, 1970, 1960])),
                Arc::new(Float64Array::from(vec![Some(50.5), None, Some(40.0)])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir()
            .join(format!("baseline-chart-loader-{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = read_parquet(&path).unwrap();
        let loaded = load_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(
            rows,
            vec![row("A", "1960", "50.5"), row("A", "1970", ""), row("B", "1960", "40")]
        );
        let loaded = loaded.unwrap();
        assert_eq!(loaded.dataset.country_count(), 2);
        assert_eq!(loaded.report.kept, 2);
        assert_eq!(loaded.report.dropped.len(), 1);
        assert_eq!(loaded.report.dropped[0].row, 1);
        assert_eq!(
            loaded.report.dropped[0].kind,
            IssueKind::BadLifeExpectancy(String::new())
        );
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(read_json(r#"{"country": "A"}"#).is_err());
    }

    #[test]
    fn unknown_extension_fails() {
        let err = load_file(Path::new("data/life.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
