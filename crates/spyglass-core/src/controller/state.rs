//! Controller states, status messages and published snapshots.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::engine::EngineId;
use crate::language::LanguageDescriptor;
use crate::syntax::Block;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_COMPILING: &str = "Compiling...";
pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_ERRORS: &str = "Errors during compilation";

pub(crate) fn failure_status(reason: &str) -> String {
    format!("Generation failed: {reason}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenerationState {
    Idle,
    PendingDebounce { deadline: Instant },
    Generating,
    Succeeded,
    Failed(String),
}

impl RegenerationState {
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Short label used in snapshots and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PendingDebounce { .. } => "pending",
            Self::Generating => "generating",
            Self::Succeeded => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for RegenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Everything presentation reads from the controller, at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub state: String,
    pub status: String,
    pub template_text: String,
    pub selected_engine: Option<EngineId>,
    pub selected_language: Option<LanguageDescriptor>,
    pub languages: Vec<LanguageDescriptor>,
    pub design_time_mode: bool,
    pub generated_code: String,
    pub generated_tree: Option<Block>,
    pub generation_count: u64,
}
