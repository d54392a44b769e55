use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use nutrition_paradox::config::AppConfig;
use nutrition_paradox::data::loader::load_store;
use nutrition_paradox::data::model::{DatasetKind, Record};
use nutrition_paradox::query::DuckDbStore;

const COUNTRIES: [(&str, &str, f64, f64); 12] = [
    // (country, region, baseline obesity %, baseline malnutrition %)
    ("India", "South-East Asia", 3.5, 28.0),
    ("Indonesia", "South-East Asia", 6.0, 18.0),
    ("Nigeria", "Africa", 8.0, 24.0),
    ("Chad", "Africa", 5.0, 31.0),
    ("Kenya", "Africa", 7.0, 19.0),
    ("Brazil", "Americas", 20.0, 4.0),
    ("USA", "Americas", 34.0, 1.5),
    ("Peru", "Americas", 19.0, 6.0),
    ("China", "Western Pacific", 6.5, 5.0),
    ("Japan", "Western Pacific", 4.0, 3.0),
    ("Germany", "Europe", 22.0, 1.0),
    ("Egypt", "Eastern Mediterranean", 31.0, 9.0),
];
const YEARS: std::ops::RangeInclusive<i32> = 2012..=2022;
const GENDERS: [&str; 3] = ["Male", "Female", "Both"];
const AGE_GROUPS: [&str; 2] = ["Adult", "Child/Adolescent"];

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

fn level(kind: DatasetKind, estimate: f64) -> &'static str {
    let (moderate, high) = match kind {
        DatasetKind::Obesity => (25.0, 30.0),
        DatasetKind::Malnutrition => (10.0, 20.0),
    };
    if estimate >= high {
        "High"
    } else if estimate >= moderate {
        "Moderate"
    } else {
        "Low"
    }
}

fn generate(kind: DatasetKind, rng: &mut SimpleRng) -> Vec<Record> {
    let mut records = Vec::new();
    for &(country, region, obesity, malnutrition) in &COUNTRIES {
        let (baseline, slope) = match kind {
            DatasetKind::Obesity => (obesity, 0.35),
            DatasetKind::Malnutrition => (malnutrition, -0.25),
        };
        for year in YEARS {
            for gender in GENDERS {
                let gender_shift = match (kind, gender) {
                    (DatasetKind::Obesity, "Female") => 3.0,
                    (DatasetKind::Obesity, "Male") => -2.0,
                    (DatasetKind::Malnutrition, "Female") => 1.0,
                    _ => 0.0,
                };
                for age_group in AGE_GROUPS {
                    let age_factor = if age_group == "Adult" { 1.0 } else { 0.6 };
                    let trend = baseline + slope * (year - YEARS.start()) as f64;
                    let estimate = ((trend + gender_shift) * age_factor + rng.gauss(0.0, 0.8))
                        .clamp(0.1, 99.0);
                    let ci_width = (2.0 + rng.next_f64() * 6.0 * age_factor.recip()).min(15.0);
                    records.push(Record {
                        country: country.to_string(),
                        region: Some(region.to_string()),
                        year,
                        gender: gender.to_string(),
                        age_group: age_group.to_string(),
                        mean_estimate: Some((estimate * 100.0).round() / 100.0),
                        ci_width: Some((ci_width * 100.0).round() / 100.0),
                        level: level(kind, estimate).to_string(),
                    });
                }
            }
        }
    }
    records
}

fn headers(kind: DatasetKind) -> [&'static str; 10] {
    [
        "Year",
        "Gender",
        "Mean_Estimate",
        "LowerBound",
        "UpperBound",
        "Age_Group",
        "Country",
        "Region",
        "CI_Width",
        kind.level_column(),
    ]
}

fn write_csv(path: &Path, kind: DatasetKind, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers(kind))?;
    let cell = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
    for r in records {
        let bounds = r.mean_estimate.zip(r.ci_width).map(|(m, ci)| (m - ci / 2.0, m + ci / 2.0));
        writer.write_record([
            r.year.to_string(),
            r.gender.clone(),
            cell(r.mean_estimate),
            cell(bounds.map(|b| b.0)),
            cell(bounds.map(|b| b.1)),
            r.age_group.clone(),
            r.country.clone(),
            r.region.clone().unwrap_or_default(),
            cell(r.ci_width),
            r.level.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, kind: DatasetKind, records: &[Record]) -> Result<()> {
    let text = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Record) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, true),
        Field::new("Year", DataType::Int32, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Age_Group", DataType::Utf8, false),
        Field::new("Mean_Estimate", DataType::Float64, true),
        Field::new("CI_Width", DataType::Float64, true),
        Field::new(kind.level_column(), DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.country.as_str()),
        Arc::new(StringArray::from(
            records
                .iter()
                .map(|r| r.region.as_deref())
                .collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
        text(|r| r.gender.as_str()),
        text(|r| r.age_group.as_str()),
        float(|r| r.mean_estimate),
        float(|r| r.ci_width),
        text(|r| r.level.as_str()),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

struct Args {
    out_dir: PathBuf,
    parquet: bool,
    seed_store: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        out_dir: PathBuf::from("."),
        parquet: false,
        seed_store: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--parquet" => args.parquet = true,
            "--seed" => {
                args.seed_store = Some(it.next().context("--seed needs a store URL")?);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            dir => args.out_dir = PathBuf::from(dir),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let config = AppConfig::default().with_data_dir(&args.out_dir);

    for (kind, csv_path) in [
        (DatasetKind::Obesity, &config.obesity_path),
        (DatasetKind::Malnutrition, &config.malnutrition_path),
    ] {
        let records = generate(kind, &mut rng);
        write_csv(csv_path, kind, &records)?;
        println!("Wrote {} {kind} records to {}", records.len(), csv_path.display());

        if args.parquet {
            let pq_path = csv_path.with_extension("parquet");
            write_parquet(&pq_path, kind, &records)?;
            println!("Wrote {}", pq_path.display());
        }
    }

    if let Some(url) = args.seed_store {
        let store = load_store(&config).context("re-reading generated datasets")?;
        DuckDbStore::from_url(&url)
            .seed(&store)
            .with_context(|| format!("seeding {url}"))?;
        println!("Seeded store {url}");
    }

    Ok(())
}
