use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Observation – one normalized row of the source table
// ---------------------------------------------------------------------------

/// A single life-expectancy reading for one country in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub life_expectancy: f64,
}

// ---------------------------------------------------------------------------
// Series – all observations of one country, year ascending
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub country: String,
    /// Ordered by `year`, no duplicate years.
    pub points: Vec<Observation>,
}

impl Series {
    /// Observation recorded exactly in `year`, if any.
    pub fn at_year(&self, year: i32) -> Option<&Observation> {
        self.points
            .binary_search_by_key(&year, |o| o.year)
            .ok()
            .map(|i| &self.points[i])
    }
}

// ---------------------------------------------------------------------------
// YearExtent – inclusive [min, max] year over the whole dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearExtent {
    pub min: i32,
    pub max: i32,
}

impl YearExtent {
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized dataset
// ---------------------------------------------------------------------------

/// All series, keyed and ordered by country name. Fixed after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    series: Vec<Series>,
    year_extent: YearExtent,
}

impl Dataset {
    /// Group observations by country and sort each series by year.
    ///
    /// Returns `None` when `observations` is empty, since an empty dataset
    /// has no year domain.
    pub fn from_observations(observations: Vec<Observation>) -> Option<Self> {
        let mut grouped: BTreeMap<String, Vec<Observation>> = BTreeMap::new();
        let mut min = i32::MAX;
        let mut max = i32::MIN;

        for obs in observations {
            min = min.min(obs.year);
            max = max.max(obs.year);
            grouped.entry(obs.country.clone()).or_default().push(obs);
        }
        if grouped.is_empty() {
            return None;
        }

        let series = grouped
            .into_iter()
            .map(|(country, mut points)| {
                points.sort_by_key(|o| o.year);
                Series { country, points }
            })
            .collect();

        Some(Dataset {
            series,
            year_extent: YearExtent { min, max },
        })
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, country: &str) -> Option<&Series> {
        self.series
            .binary_search_by(|s| s.country.as_str().cmp(country))
            .ok()
            .map(|i| &self.series[i])
    }

    pub fn year_extent(&self) -> YearExtent {
        self.year_extent
    }

    pub fn country_count(&self) -> usize {
        self.series.len()
    }
}
