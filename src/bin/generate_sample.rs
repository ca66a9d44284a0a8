use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i32 = 1960;
const LAST_YEAR: i32 = 2016;

/// (country, life expectancy in 1960, ceiling, growth rate, first year reported)
const COUNTRIES: [(&str, f64, f64, f64, i32); 12] = [
    ("Afghanistan", 32.0, 66.0, 0.040, FIRST_YEAR),
    ("Brazil", 54.0, 78.0, 0.050, FIRST_YEAR),
    ("Chad", 38.0, 58.0, 0.035, FIRST_YEAR),
    ("China", 44.0, 79.0, 0.090, FIRST_YEAR),
    ("Estonia", 67.0, 80.0, 0.030, 1992),
    ("India", 41.0, 71.0, 0.055, FIRST_YEAR),
    ("Japan", 67.5, 85.0, 0.070, FIRST_YEAR),
    ("Nigeria", 37.0, 56.0, 0.030, FIRST_YEAR),
    ("Norway", 73.5, 83.0, 0.045, FIRST_YEAR),
    ("Peru", 48.0, 77.0, 0.060, FIRST_YEAR),
    ("Timor-Leste", 33.0, 70.0, 0.050, 2002),
    ("United States", 69.8, 80.0, 0.040, FIRST_YEAR),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Saturating growth from `start` towards `ceiling`.
fn life_expectancy(start: f64, ceiling: f64, rate: f64, years: f64) -> f64 {
    ceiling - (ceiling - start) * (-rate * years).exp()
}

struct Rows {
    country: Vec<String>,
    year: Vec<i32>,
    le: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Rows {
    let mut rows = Rows {
        country: Vec::new(),
        year: Vec::new(),
        le: Vec::new(),
    };
    for &(name, start, ceiling, rate, first) in &COUNTRIES {
        for year in first..=LAST_YEAR {
            let t = (year - FIRST_YEAR) as f64;
            let value = life_expectancy(start, ceiling, rate, t) + rng.gauss(0.0, 0.25);
            rows.country.push(name.to_string());
            rows.year.push(year);
            rows.le.push((value * 100.0).round() / 100.0);
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &Rows) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["country", "year", "life-expectancy"])?;
    for i in 0..rows.year.len() {
        writer.write_record([
            rows.country[i].clone(),
            rows.year[i].to_string(),
            rows.le[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &Rows) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("life-expectancy", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.country.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(rows.year.clone())),
            Arc::new(Float64Array::from(rows.le.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;
    let csv_path = dir.join("life-expectancy.csv");
    let parquet_path = dir.join("life-expectancy.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} observations for {} countries to {} and {}",
        rows.year.len(),
        COUNTRIES.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
