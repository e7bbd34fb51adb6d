// CLI commands: wire extraction, storage, scaffolding and runs together
use crate::config::ProfileManager;
use crate::executor::{self, RunOptions};
use crate::{extractor, inference, report, scaffold};
use anyhow::{Context, Result};
use gavel_common::store;
use gavel_common::types::Fixture;
use std::fs;
use std::path::Path;

fn load_manager(config: Option<&Path>) -> Result<ProfileManager> {
    match config {
        Some(path) => ProfileManager::load(path),
        None => ProfileManager::load_default(),
    }
}

/// Extract fixtures from a saved problem statement, store them, and scaffold
/// solution templates from the first fixture's inferred input shapes.
pub async fn extract(
    source: &Path,
    problem: Option<&str>,
    out_dir: &Path,
    function_name: &str,
) -> Result<()> {
    println!("🔎 Extracting fixtures from {}", source.display());

    let text = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let fixtures = extractor::extract(&text)?;
    println!("  Found {} example(s)", fixtures.len());

    let batch_id = match problem {
        Some(name) => name.to_string(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "problem".to_string()),
    };
    let problem_dir = out_dir.join(&batch_id);

    let manifest = store::save_fixtures(&problem_dir, &batch_id, &fixtures)?;
    println!(
        "📝 Saved {} fixture pair(s) under {}",
        manifest.batch.size,
        problem_dir.join(store::TEST_CASES_DIR).display()
    );

    let shapes = inference::infer_shapes(&fixtures[0].inputs);
    let cpp_path = problem_dir.join("solution.cpp");
    fs::write(&cpp_path, scaffold::cpp_template(function_name, &shapes))
        .with_context(|| format!("failed to write {}", cpp_path.display()))?;
    let py_path = problem_dir.join("solution.py");
    fs::write(&py_path, scaffold::python_template(function_name, &shapes))
        .with_context(|| format!("failed to write {}", py_path.display()))?;
    println!("🧩 Scaffolded solution.cpp and solution.py");

    println!("✅ Problem '{}' is ready", batch_id);
    println!("\n📋 Next steps:");
    println!("  1. Fill in {}", cpp_path.display());
    println!(
        "  2. Run the fixtures: gavel run {}",
        cpp_path.display()
    );

    Ok(())
}

/// Run a solution against its stored fixtures and print the report.
pub async fn run(
    solution: &Path,
    config: Option<&Path>,
    timeout_ms: Option<u64>,
    opts: RunOptions,
) -> Result<()> {
    let manager = load_manager(config)?;
    let solution = solution
        .canonicalize()
        .with_context(|| format!("solution file not found: {}", solution.display()))?;

    let opts = RunOptions { timeout_ms, ..opts };
    let result = executor::run_stored(&solution, &manager, &opts).await?;

    print!("{}", report::render_markdown(&result));
    Ok(())
}

/// Run a solution against one ad-hoc fixture. The input string is split into
/// values on top-level commas; the expected output is taken whole.
pub async fn manual(
    solution: &Path,
    input: &str,
    expected: &str,
    config: Option<&Path>,
    timeout_ms: Option<u64>,
    opts: RunOptions,
) -> Result<()> {
    let manager = load_manager(config)?;
    let solution = solution
        .canonicalize()
        .with_context(|| format!("solution file not found: {}", solution.display()))?;

    let inputs = extractor::split_top_level(input);
    anyhow::ensure!(!inputs.is_empty(), "no input values given");
    let fixture = Fixture {
        inputs,
        outputs: vec![expected.trim().to_string()],
    };

    let opts = RunOptions { timeout_ms, ..opts };
    let result = executor::run_manual(&solution, &manager, &fixture, &opts).await?;

    print!("{}", report::render_markdown(&result));
    Ok(())
}

/// List the configured language profiles.
pub fn languages(config: Option<&Path>) -> Result<()> {
    let manager = load_manager(config)?;
    let entries = manager.list();

    println!("📋 Configured Languages:\n");
    println!("{:<10} {:<40} {:<10}", "Name", "Run", "Compiles");
    println!("{}", "─".repeat(64));
    for (language, profile) in &entries {
        println!(
            "{:<10} {:<40} {:<10}",
            language.name(),
            profile.run,
            if profile.compile.is_some() { "yes" } else { "no" }
        );
    }
    println!("\n✅ Total: {} language(s)", entries.len());

    Ok(())
}
