//! Update module - the manual-push and scheduled-pull flows.
//!
//! Each request walks
//! `normalize → consolidate → gate → retrain` for one entity while holding
//! that entity's lock, and ends in an [`UpdateOutcome`].

mod update_model;
mod update_orchestrator;
mod update_traits;

#[cfg(test)]
mod orchestrator_tests;

pub use update_model::{PipelineSettings, UpdateOutcome, UpdateStatus};
pub use update_orchestrator::UpdateOrchestrator;
pub use update_traits::UpdateOrchestratorTrait;
