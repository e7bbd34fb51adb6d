/// Run Orchestration - High-Level Glue
///
/// **Responsibility:**
/// Coordinate profile lookup, the compile gate, the fixture loop, and
/// grading to produce a final report.
///
/// **Architecture:**
/// 1. Resolve the candidate's language from its file extension
/// 2. Compile once when the profile asks for it (failure aborts everything)
/// 3. Run every stored fixture sequentially through the engine (engine.rs)
/// 4. Grade each raw output with the evaluator (evaluator.rs)
///
/// This module is the glue layer - it knows nothing about:
/// - How processes are spawned (engine's job)
/// - How outputs are compared (evaluator's job)
use crate::config::{LanguageProfile, ProfileManager};
use crate::engine::{self, DEFAULT_TIMEOUT_MS};
use crate::evaluator;
use gavel_common::error::{GavelError, Result};
use gavel_common::store;
use gavel_common::types::{Fixture, Language, Report};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Caller-side knobs for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Overrides the profile's time limit when set.
    pub timeout_ms: Option<u64>,
    /// Checked between fixtures; a set flag stops the run after the current
    /// fixture and returns the outcomes produced so far.
    pub cancel: Arc<AtomicBool>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Run a candidate against every fixture stored next to it.
///
/// Fixtures are executed strictly sequentially: each child is fully awaited
/// (input written, streams drained, exit observed) before the next starts.
pub async fn run_stored(file: &Path, manager: &ProfileManager, opts: &RunOptions) -> Result<Report> {
    let (language, profile) = resolve(file, manager)?;

    let problem_dir = file
        .parent()
        .ok_or_else(|| GavelError::ParseFailure("solution file has no parent directory".into()))?;
    let fixtures = store::load_fixtures(problem_dir)?;
    if fixtures.is_empty() {
        return Err(GavelError::ParseFailure(format!(
            "no fixtures stored under {}",
            problem_dir.display()
        )));
    }

    info!(
        language = %language,
        fixture_count = fixtures.len(),
        file = %file.display(),
        "starting run"
    );

    if let Some(compile_template) = &profile.compile {
        engine::compile(compile_template, file).await?;
    }

    let run_command = engine::substitute(&profile.run, file);
    let timeout_ms = effective_timeout(opts, profile);

    let mut outcomes = Vec::with_capacity(fixtures.len());
    for fixture in &fixtures {
        if opts.cancel.load(Ordering::Relaxed) {
            warn!(
                completed = outcomes.len(),
                total = fixtures.len(),
                "cancellation requested - stopping run"
            );
            break;
        }

        let output =
            engine::run_fixture(&run_command, fixture.index, &fixture.input, timeout_ms).await?;
        info!(
            fixture = fixture.index,
            execution_ms = output.duration_ms,
            "fixture executed"
        );
        outcomes.push(evaluator::evaluate_fixture(
            &output,
            &fixture.input,
            &fixture.expected_output,
        ));
    }

    Ok(evaluator::aggregate(outcomes))
}

/// Run a candidate against one ad-hoc fixture supplied directly.
pub async fn run_manual(
    file: &Path,
    manager: &ProfileManager,
    fixture: &Fixture,
    opts: &RunOptions,
) -> Result<Report> {
    let (language, profile) = resolve(file, manager)?;
    info!(language = %language, file = %file.display(), "starting manual run");

    if let Some(compile_template) = &profile.compile {
        engine::compile(compile_template, file).await?;
    }

    let run_command = engine::substitute(&profile.run, file);
    let timeout_ms = effective_timeout(opts, profile);

    let input = fixture.stdin_payload();
    let expected = fixture.expected_payload();
    let output = engine::run_fixture(&run_command, 1, &input, timeout_ms).await?;
    let outcome = evaluator::evaluate_fixture(&output, &input, &expected);

    Ok(evaluator::aggregate(vec![outcome]))
}

fn resolve<'a>(
    file: &Path,
    manager: &'a ProfileManager,
) -> Result<(Language, &'a LanguageProfile)> {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let language = Language::from_extension(ext)
        .ok_or_else(|| GavelError::UnsupportedLanguage(ext.to_string()))?;
    let profile = manager.profile(language)?;
    Ok((language, profile))
}

fn effective_timeout(opts: &RunOptions, profile: &LanguageProfile) -> u64 {
    opts.timeout_ms
        .or(profile.timeout_ms)
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}
