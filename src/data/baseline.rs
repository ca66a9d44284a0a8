use super::model::Dataset;

// ---------------------------------------------------------------------------
// Derived data: diffs relative to a baseline year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPoint {
    pub year: i32,
    /// Life expectancy minus the same country's value in the baseline year.
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub country: String,
    /// Life expectancy in the baseline year.
    pub baseline: f64,
    /// One point per observation of the source series, same order.
    pub points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    pub fn diff_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|i| self.points[i].diff)
    }

    /// Diff of the most recent year.
    pub fn last_diff(&self) -> Option<f64> {
        self.points.last().map(|p| p.diff)
    }
}

/// Output of one recompute. Series keep the dataset's country order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebaselined {
    pub baseline_year: i32,
    pub series: Vec<DerivedSeries>,
    /// Countries with no observation in `baseline_year`, skipped this frame.
    pub skipped: Vec<String>,
}

impl Rebaselined {
    pub fn get(&self, country: &str) -> Option<&DerivedSeries> {
        self.series
            .binary_search_by(|s| s.country.as_str().cmp(country))
            .ok()
            .map(|i| &self.series[i])
    }

    pub fn is_skipped(&self, country: &str) -> bool {
        self.skipped.iter().any(|c| c == country)
    }
}

/// Re-express every series relative to its own value in `baseline_year`.
///
/// A country without an observation in exactly that year is left out of
/// `series` and listed in `skipped`. The whole dataset is recomputed on each
/// call; nothing is cached between baselines.
pub fn recompute(dataset: &Dataset, baseline_year: i32) -> Rebaselined {
    let mut series = Vec::with_capacity(dataset.country_count());
    let mut skipped = Vec::new();

    for s in dataset.series() {
        let Some(base) = s.at_year(baseline_year) else {
            skipped.push(s.country.clone());
            continue;
        };
        let baseline = base.life_expectancy;
        series.push(DerivedSeries {
            country: s.country.clone(),
            baseline,
            points: s
                .points
                .iter()
                .map(|o| DerivedPoint {
                    year: o.year,
                    diff: o.life_expectancy - baseline,
                })
                .collect(),
        });
    }

    log::debug!(
        "Rebaselined to {baseline_year}: {} series, {} skipped",
        series.len(),
        skipped.len()
    );

    Rebaselined {
        baseline_year,
        series,
        skipped,
    }
}
