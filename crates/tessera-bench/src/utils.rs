//! Benchmark utilities and helpers.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_common::{ColumnDef, DataType, Value};

/// Columns of the benchmark table: `(id INT, name VARCHAR(16), score LONG)`.
pub fn bench_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id", DataType::Int).not_null(),
        ColumnDef::new("name", DataType::Varchar(16)),
        ColumnDef::new("score", DataType::Long),
    ]
}

/// Generates random string data for benchmarks.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates rows matching [`bench_columns`], seeded for repeatability.
pub fn generate_rows(count: usize) -> Vec<Vec<Value>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let len = rng.gen_range(1..=16);
            let name = random_string(&mut rng, len);
            let score: i64 = rng.gen_range(0..1_000_000);
            vec![Value::Int(i as i32), Value::String(name), Value::Long(score)]
        })
        .collect()
}
