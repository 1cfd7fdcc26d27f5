//! Parallel warm-up of compiled documents.
//!
//! Collects every stale compiled document under the lock, compiles them in
//! parallel with the lock released, then commits each result under the lock
//! again. A result is dropped if the compiled document moved past it in the
//! meantime, so a slow warm-up never overwrites a newer compile.

use rayon::prelude::*;

use super::core::Project;
use super::manager::CompileJob;
use super::state::ProjectState;

/// Outcome of [`Project::warm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmReport {
    /// Documents compiled successfully.
    pub compiled: usize,
    /// Documents whose compile failed (reported to the sink).
    pub failed: usize,
    /// Results discarded because a newer compile landed first.
    pub superseded: usize,
}

impl Project {
    /// Compile every alternate-syntax document whose source has advanced.
    pub fn warm(&self) -> WarmReport {
        let jobs = {
            let mut state = self.state.lock();
            self.stale_jobs(&mut state)
        };
        if jobs.is_empty() {
            return WarmReport::default();
        }

        let results: Vec<_> = jobs
            .into_par_iter()
            .map(|job| {
                let result = job.run();
                (job, result)
            })
            .collect();

        let mut report = WarmReport::default();
        let mut state = self.state.lock();
        for (job, result) in results {
            let ok = result.is_ok();
            match (self.commit(&mut state, &job, result), ok) {
                (false, _) => report.superseded += 1,
                (true, true) => report.compiled += 1,
                (true, false) => report.failed += 1,
            }
        }
        tracing::debug!(
            compiled = report.compiled,
            failed = report.failed,
            superseded = report.superseded,
            "warm-up finished"
        );
        report
    }

    fn stale_jobs(&self, state: &mut ProjectState) -> Vec<CompileJob> {
        let mut jobs = Vec::new();
        for (compiled, source) in state.store.compiled_pairs() {
            let Some(transpiler) = self.registry.compiled_target(&compiled) else {
                continue;
            };
            let Some((text, version)) = self.source_text(state, &source) else {
                continue;
            };
            let compiled_version = state.store.ensure_compiled(&compiled, &source).version();
            if version > compiled_version {
                jobs.push(CompileJob {
                    transpiler,
                    source,
                    compiled,
                    text,
                    version,
                });
            }
        }
        jobs
    }
}
