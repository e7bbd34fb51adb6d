use crate::error::{GavelError, Result};
use crate::types::Fixture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk fixture storage semantics.
///
/// Layout under a problem directory:
///   test_cases/input_N.txt    fixture N's input values, newline-joined
///   test_cases/output_N.txt   fixture N's output values, newline-joined
///   manifest.json             ordered index of the pairs plus batch metadata
///
/// File names and manifest paths are deterministic so the extraction side and
/// the run side never drift.
pub const TEST_CASES_DIR: &str = "test_cases";
pub const MANIFEST_FILE: &str = "manifest.json";

pub fn input_file_name(index: usize) -> String {
    format!("input_{}.txt", index)
}

pub fn output_file_name(index: usize) -> String {
    format!("output_{}.txt", index)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub size: usize,
}

/// Relative locations of one input/output pair, in fixture order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEntry {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub batch: Batch,
    pub tests: Vec<TestEntry>,
    pub fetched_at: DateTime<Utc>,
}

/// One stored fixture loaded back for execution. The split into individual
/// values is not reconstructed: the input text is fed to stdin verbatim and
/// the output text is what grading compares against.
#[derive(Debug, Clone)]
pub struct StoredFixture {
    pub index: u32,
    pub input: String,
    pub expected_output: String,
}

/// Write the fixtures and their manifest under `problem_dir`.
pub fn save_fixtures(problem_dir: &Path, batch_id: &str, fixtures: &[Fixture]) -> Result<Manifest> {
    let cases_dir = problem_dir.join(TEST_CASES_DIR);
    fs::create_dir_all(&cases_dir)?;

    let mut tests = Vec::with_capacity(fixtures.len());
    for (i, fixture) in fixtures.iter().enumerate() {
        let n = i + 1;
        fs::write(cases_dir.join(input_file_name(n)), fixture.stdin_payload())?;
        fs::write(cases_dir.join(output_file_name(n)), fixture.expected_payload())?;
        tests.push(TestEntry {
            input: format!("{}/{}", TEST_CASES_DIR, input_file_name(n)),
            output: format!("{}/{}", TEST_CASES_DIR, output_file_name(n)),
        });
    }

    let manifest = Manifest {
        batch: Batch {
            id: batch_id.to_string(),
            size: fixtures.len(),
        },
        tests,
        fetched_at: Utc::now(),
    };

    let payload = serde_json::to_string_pretty(&manifest)?;
    fs::write(problem_dir.join(MANIFEST_FILE), payload)?;

    Ok(manifest)
}

/// Read the manifest back. Any unreadable or malformed state is a
/// `ParseFailure` naming what went wrong.
pub fn load_manifest(problem_dir: &Path) -> Result<Manifest> {
    let path = problem_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path)
        .map_err(|e| GavelError::ParseFailure(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| GavelError::ParseFailure(format!("{}: {}", path.display(), e)))
}

/// Load every stored fixture pair, in manifest order.
pub fn load_fixtures(problem_dir: &Path) -> Result<Vec<StoredFixture>> {
    let manifest = load_manifest(problem_dir)?;
    let mut fixtures = Vec::with_capacity(manifest.tests.len());

    for (i, entry) in manifest.tests.iter().enumerate() {
        let input = read_entry_file(problem_dir, &entry.input)?;
        let expected_output = read_entry_file(problem_dir, &entry.output)?;
        fixtures.push(StoredFixture {
            index: (i + 1) as u32,
            input,
            expected_output,
        });
    }

    Ok(fixtures)
}

fn read_entry_file(problem_dir: &Path, relative: &str) -> Result<String> {
    let path: PathBuf = problem_dir.join(relative);
    fs::read_to_string(&path)
        .map_err(|e| GavelError::ParseFailure(format!("{}: {}", path.display(), e)))
}
