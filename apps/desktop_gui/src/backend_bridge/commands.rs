//! Backend commands queued from UI to backend worker.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SaveCount {
        correct_count: i64,
        defect_count: i64,
        custom_fields: BTreeMap<String, String>,
    },
    ResetCount,
    ResetCountCurrent {
        correct_count: i64,
        defect_count: i64,
        item_no: String,
    },
    Start,
    Pause,
    Stop,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SaveCount { .. } => "save_count",
            BackendCommand::ResetCount => "reset_count",
            BackendCommand::ResetCountCurrent { .. } => "reset_count_current",
            BackendCommand::Start => "start_count",
            BackendCommand::Pause => "pause_count",
            BackendCommand::Stop => "stop_count",
        }
    }
}
