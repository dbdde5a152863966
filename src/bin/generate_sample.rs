//! Writes `sample_sales.csv` and `sample_sales.xlsx`: a small sales table with
//! a few duplicated rows and missing numbers, handy for trying the cleaning
//! buttons.

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

struct Row {
    region: &'static str,
    month: u32,
    units: Option<f64>,
    price: Option<f64>,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let regions = ["North", "South", "East", "West"];
    let mut rows = Vec::new();

    for month in 1..=6 {
        for &region in &regions {
            let units = (20.0 + rng.next_f64() * 80.0).round();
            let price = (rng.next_f64() * 1000.0).round() / 100.0 + 5.0;
            rows.push(Row {
                region,
                month,
                // Roughly one in eight cells left empty.
                units: (rng.below(8) != 0).then_some(units),
                price: (rng.below(8) != 0).then_some(price),
            });
        }
    }

    // Exact repeats of a few earlier rows.
    for _ in 0..4 {
        let i = rng.below(rows.len() as u64) as usize;
        let r = &rows[i];
        rows.push(Row {
            region: r.region,
            month: r.month,
            units: r.units,
            price: r.price,
        });
    }
    rows
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["region", "month", "units", "price"])?;
    for r in rows {
        writer.write_record([
            r.region.to_string(),
            r.month.to_string(),
            cell(r.units),
            cell(r.price),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, rows: &[Row]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in ["region", "month", "units", "price"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, r.region)?;
        sheet.write_number(row, 1, r.month)?;
        if let Some(units) = r.units {
            sheet.write_number(row, 2, units)?;
        }
        if let Some(price) = r.price {
            sheet.write_number(row, 3, price)?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv("sample_sales.csv", &rows)?;
    write_xlsx("sample_sales.xlsx", &rows)?;

    println!(
        "Wrote {} rows to sample_sales.csv and sample_sales.xlsx",
        rows.len()
    );
    Ok(())
}
