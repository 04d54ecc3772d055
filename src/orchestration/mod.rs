//! Services that combine the pure rule engines with storage.

pub mod performances;
pub mod squads;

pub use performances::{PerformanceRecorder, RecordingError};
pub use squads::{SquadService, SubmissionError, MAX_TEAM_NAME_LEN};
