use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a candidate solution may be written in.
///
/// The set is closed on purpose: every supported language is enumerated here
/// and carries a static file-extension mapping, so an unknown extension is
/// rejected before any process is spawned rather than failing mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Rust,
}

impl Language {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "python" => Some(Language::Python),
            "cpp" => Some(Language::Cpp),
            "rust" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic shape of one raw input value, inferred from its textual form.
/// Anything that doesn't match a known shape degrades to `Str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueShape {
    Int,
    Str,
    ListInt,
    ListStr,
    MatrixInt,
}

/// One example: ordered raw input values and ordered expected-output values.
///
/// Both lists are non-empty at emission and preserve source order; argument
/// order matters when the values are later fed to a candidate program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl Fixture {
    /// The text written to a candidate's stdin: one value per line.
    pub fn stdin_payload(&self) -> String {
        self.inputs.join("\n")
    }

    /// The text graded against: values newline-joined, same as storage.
    pub fn expected_payload(&self) -> String {
        self.outputs.join("\n")
    }
}

/// The recorded result of running one fixture. Created once by the execution
/// side, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// 1-based, contiguous, matches fixture source order.
    pub index: u32,
    pub input: String,
    pub expected_output: String,
    /// Trimmed stdout; empty when the candidate crashed or timed out.
    pub actual_output: String,
    pub passed: bool,
    pub execution_time_ms: f64,
    /// Captured diagnostic stream on failure.
    pub error: Option<String>,
}

/// Ordered collection of outcomes with derived summary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    outcomes: Vec<TestOutcome>,
}

impl Report {
    pub fn new(outcomes: Vec<TestOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total()
    }
}
