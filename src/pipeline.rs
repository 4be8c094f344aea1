//! Debounced recomputation of the filtered record set.
//!
//! The pipeline itself owns no timer. Every change to the records or the
//! filter state goes through [`FilterPipeline::request`], which bumps a
//! generation id and tells the caller how long to wait. When the wait is over
//! the caller hands the generation back to [`FilterPipeline::run`]; anything
//! but the newest generation is dropped, so a burst of changes filters once,
//! with the final state.

use crate::config::{BUSY_INDICATOR_THRESHOLD, DEBOUNCE_MS};
use crate::filters::{filter_records, FilterReport, FilterState};
use crate::record::Record;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    PendingRecompute,
    Filtering,
}

/// Tuning for the debounce and the in-progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub debounce_ms: u32,
    /// Record counts above this show the busy indicator while filtering.
    pub busy_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            busy_threshold: BUSY_INDICATOR_THRESHOLD,
        }
    }
}

/// What the caller should do after a [`FilterPipeline::request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    /// Nothing to filter: publish this result now.
    Publish(FilterReport),
    /// Call `run(generation, ..)` once `delay_ms` has passed.
    Deferred { generation: u64, delay_ms: u32 },
}

#[derive(Debug)]
pub struct FilterPipeline {
    config: PipelineConfig,
    generation: u64,
    phase: PipelinePhase,
    busy: bool,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl FilterPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            generation: 0,
            phase: PipelinePhase::Idle,
            busy: false,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Whether the in-progress indicator should be shown.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a change to the records or filter state. Supersedes any
    /// pending run.
    pub fn request(&mut self, records: Option<&[Record]>) -> Schedule {
        self.generation += 1;
        match records {
            None | Some([]) => {
                self.phase = PipelinePhase::Idle;
                self.busy = false;
                Schedule::Publish(FilterReport::default())
            }
            Some(records) => {
                self.phase = PipelinePhase::PendingRecompute;
                self.busy = records.len() > self.config.busy_threshold;
                debug!(
                    "Filter generation {} pending ({} records)",
                    self.generation,
                    records.len()
                );
                Schedule::Deferred {
                    generation: self.generation,
                    delay_ms: self.config.debounce_ms,
                }
            }
        }
    }

    /// Filter `records` if `generation` is still the newest request.
    ///
    /// Returns `None` for superseded generations, leaving state untouched.
    pub fn run(
        &mut self,
        generation: u64,
        records: &[Record],
        filters: &FilterState,
    ) -> Option<FilterReport> {
        if generation != self.generation {
            debug!(
                "Dropping stale filter generation {} (current {})",
                generation, self.generation
            );
            return None;
        }

        self.phase = PipelinePhase::Filtering;
        let report = filter_records(records, filters);
        self.phase = PipelinePhase::Idle;
        self.busy = false;
        Some(report)
    }
}
