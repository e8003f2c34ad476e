//! Benchmark utilities.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A generated CSV file kept alive by its temporary directory.
pub struct BenchCsv {
    /// Path of the CSV file.
    pub path: PathBuf,
    /// Keys of the first column, in file order.
    pub keys: Vec<String>,
    _temp_dir: TempDir,
}

/// Generates a file of `rows` records with a unique `id` and
/// `payload_size` random bytes of text per record.
pub fn generate_csv(rows: usize, payload_size: usize) -> BenchCsv {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("bench.csv");
    let mut rng = rand::thread_rng();

    let mut content = String::from("id,name,payload\n");
    let mut keys = Vec::with_capacity(rows);
    for i in 0..rows {
        let key = format!("k{i:08}");
        let payload: String = (0..payload_size)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();
        writeln!(content, "{key},name {i},\"{payload}\"")
            .expect("Writing to a String cannot fail");
        keys.push(key);
    }
    fs::write(&path, content).expect("Failed to write CSV file");

    BenchCsv {
        path,
        keys,
        _temp_dir: temp_dir,
    }
}

/// Returns `count` keys of `csv` in random order.
pub fn shuffled_keys(csv: &BenchCsv, count: usize) -> Vec<String> {
    let mut keys = csv.keys.clone();
    keys.shuffle(&mut rand::thread_rng());
    keys.truncate(count);
    keys
}
