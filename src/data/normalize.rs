use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, Observation};

/// Header names accepted for the life-expectancy column.
pub const LIFE_EXPECTANCY_COLUMNS: [&str; 4] =
    ["life-expectancy", "life_expectancy", "lifeExpectancy", "le"];

// ---------------------------------------------------------------------------
// RawRow – a row as read from the source, every field still text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub country: String,
    pub year: String,
    #[serde(
        rename = "life-expectancy",
        alias = "life_expectancy",
        alias = "lifeExpectancy",
        alias = "le"
    )]
    pub life_expectancy: String,
}

/// One data row from a loader: either its text fields or the reason it could
/// not be split into fields at all.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRow {
    Row(RawRow),
    Malformed(String),
}

impl From<RawRow> for SourceRow {
    fn from(row: RawRow) -> Self {
        SourceRow::Row(row)
    }
}

impl RawRow {
    pub fn new(country: &str, year: &str, life_expectancy: &str) -> Self {
        RawRow {
            country: country.to_string(),
            year: year.to_string(),
            life_expectancy: life_expectancy.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row issues and the normalization report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// The record itself was unreadable (wrong field count, bad encoding).
    Malformed(String),
    EmptyCountry,
    BadYear(String),
    BadLifeExpectancy(String),
    DuplicateYear { country: String, year: i32 },
}

/// A dropped row. `row` is zero-based over the data rows (header excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct RowIssue {
    pub row: usize,
    pub kind: IssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Malformed(reason) => write!(f, "row {}: malformed ({reason})", self.row),
            IssueKind::EmptyCountry => write!(f, "row {}: empty country", self.row),
            IssueKind::BadYear(v) => write!(f, "row {}: year '{v}' is not an integer", self.row),
            IssueKind::BadLifeExpectancy(v) => {
                write!(f, "row {}: life expectancy '{v}' is not a number", self.row)
            }
            IssueKind::DuplicateYear { country, year } => {
                write!(f, "row {}: duplicate {country} {year}, first kept", self.row)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub kept: usize,
    pub dropped: Vec<RowIssue>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no valid rows ({dropped} rows dropped)")]
    Empty { dropped: usize },
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Parse a year, accepting integral floats like `"1960.0"`.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

pub fn parse_life_expectancy(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce(row: &RawRow) -> Result<Observation, IssueKind> {
    let country = row.country.trim();
    if country.is_empty() {
        return Err(IssueKind::EmptyCountry);
    }
    let year = parse_year(&row.year).ok_or_else(|| IssueKind::BadYear(row.year.clone()))?;
    let life_expectancy = parse_life_expectancy(&row.life_expectancy)
        .ok_or_else(|| IssueKind::BadLifeExpectancy(row.life_expectancy.clone()))?;
    Ok(Observation {
        country: country.to_string(),
        year,
        life_expectancy,
    })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Coerce raw rows and group them into a [`Dataset`].
///
/// Malformed rows and rows that fail coercion are dropped and recorded in the
/// report; the first occurrence of a `(country, year)` pair wins.
pub fn normalize<I, R>(rows: I) -> Result<(Dataset, NormalizeReport), NormalizeError>
where
    I: IntoIterator<Item = R>,
    R: Into<SourceRow>,
{
    let mut report = NormalizeReport::default();
    let mut seen: BTreeSet<(String, i32)> = BTreeSet::new();
    let mut observations = Vec::new();

    for (row, source) in rows.into_iter().enumerate() {
        let coerced = match Into::<SourceRow>::into(source) {
            SourceRow::Row(raw) => coerce(&raw),
            SourceRow::Malformed(reason) => Err(IssueKind::Malformed(reason)),
        };
        let obs = match coerced {
            Ok(obs) => obs,
            Err(kind) => {
                report.dropped.push(RowIssue { row, kind });
                continue;
            }
        };
        if !seen.insert((obs.country.clone(), obs.year)) {
            report.dropped.push(RowIssue {
                row,
                kind: IssueKind::DuplicateYear {
                    country: obs.country,
                    year: obs.year,
                },
            });
            continue;
        }
        observations.push(obs);
    }

    for issue in &report.dropped {
        log::warn!("Dropped {issue}");
    }

    report.kept = observations.len();
    let dataset = Dataset::from_observations(observations).ok_or(NormalizeError::Empty {
        dropped: report.dropped.len(),
    })?;
    Ok((dataset, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_and_groups() {
        let (ds, report) = normalize(vec![
            RawRow::new("A", "1960", "50"),
            RawRow::new("A", "1970", "55.5"),
            RawRow::new(" B ", "1960.0", " 40 "),
        ])
        .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.kept, 3);
        assert_eq!(ds.country_count(), 2);
        let b = ds.get("B").unwrap();
        assert_eq!(b.points[0].year, 1960);
        assert_eq!(b.points[0].life_expectancy, 40.0);
        assert_eq!(ds.get("A").unwrap().points[1].life_expectancy, 55.5);
    }

    #[test]
    fn drops_non_numeric_rows() {
        let (ds, report) = normalize(vec![
            RawRow::new("A", "1960", "50"),
            RawRow::new("A", "nineteen-seventy", "55"),
            RawRow::new("A", "1980", "n/a"),
            RawRow::new("A", "1990.5", "61"),
            RawRow::new("", "1990", "61"),
            RawRow::new("A", "2000", "NaN"),
        ])
        .unwrap();

        assert_eq!(ds.get("A").unwrap().points.len(), 1);
        assert_eq!(report.kept, 1);
        let rows: Vec<usize> = report.dropped.iter().map(|i| i.row).collect();
        assert_eq!(rows, [1, 2, 3, 4, 5]);
        assert_eq!(
            report.dropped[0].kind,
            IssueKind::BadYear("nineteen-seventy".to_string())
        );
        assert_eq!(report.dropped[3].kind, IssueKind::EmptyCountry);
    }

    #[test]
    fn duplicate_year_keeps_first() {
        let (ds, report) = normalize(vec![
            RawRow::new("A", "1960", "50"),
            RawRow::new("A", "1960", "99"),
        ])
        .unwrap();

        assert_eq!(ds.get("A").unwrap().points[0].life_expectancy, 50.0);
        assert_eq!(
            report.dropped[0].kind,
            IssueKind::DuplicateYear {
                country: "A".to_string(),
                year: 1960
            }
        );
        assert_eq!(
            report.dropped[0].to_string(),
            "row 1: duplicate A 1960, first kept"
        );
    }

    #[test]
    fn malformed_rows_are_dropped_in_place() {
        let (ds, report) = normalize(vec![
            SourceRow::Row(RawRow::new("A", "1960", "50")),
            SourceRow::Malformed("found record with 2 fields".to_string()),
            SourceRow::Row(RawRow::new("A", "1970", "55")),
        ])
        .unwrap();

        assert_eq!(report.kept, 2);
        assert_eq!(ds.get("A").unwrap().points.len(), 2);
        assert_eq!(
            report.dropped[0].to_string(),
            "row 1: malformed (found record with 2 fields)"
        );
    }

    #[test]
    fn all_rows_invalid_is_an_error() {
        let err = normalize(vec![RawRow::new("A", "x", "y")]).unwrap_err();
        assert!(matches!(err, NormalizeError::Empty { dropped: 1 }));
    }
}
