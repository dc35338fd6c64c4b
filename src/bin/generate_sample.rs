//! Writes `sample_data.csv`: a small messy dataset (duplicate rows, missing
//! values, numeric and text columns) for trying out the cleaning pipeline.

use std::path::Path;

use anyhow::{Context, Result};

use tidy_panda::data::loader::load_file;
use tidy_panda::data::schema::numeric_columns;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let cities = ["Jakarta", "Bandung", "Surabaya", "Medan"];
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["id", "city", "age", "income", "score", "member"])?;

    let mut rows: Vec<[String; 6]> = Vec::new();
    for id in 0..200u32 {
        let age = rng.gauss(38.0, 11.0).clamp(18.0, 80.0).round();
        let income = 1500.0 + age * 85.0 + rng.gauss(0.0, 900.0);
        let score = rng.gauss(70.0, 12.0);
        let city = cities[(rng.next_u64() % cities.len() as u64) as usize];
        let member = rng.chance(0.4);

        let mut row = [
            id.to_string(),
            city.to_string(),
            format!("{age}"),
            format!("{income:.2}"),
            format!("{score:.1}"),
            member.to_string(),
        ];
        // Knock out ~8% of the measured values.
        for field in row.iter_mut().skip(2).take(3) {
            if rng.chance(0.08) {
                field.clear();
            }
        }
        rows.push(row);

        // Every tenth record is entered twice.
        if id % 10 == 0 {
            rows.push(rows[rows.len() - 1].clone());
        }
    }

    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let table = load_file(Path::new(&output_path))?;
    println!(
        "Wrote {} rows to {output_path} ({} missing values, numeric columns: {:?})",
        table.len(),
        table.missing_count(),
        numeric_columns(&table)
    );
    Ok(())
}
