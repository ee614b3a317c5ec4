pub mod config;
pub mod controller;
pub mod report;
pub mod session;

pub use config::{ConfigError, SessionConfig, StopRule};
pub use controller::{StaircaseController, StaircaseState, StaircaseStep};
pub use report::{HaltReason, LengthSummary, SessionReport, SessionSummary};
pub use session::{RoundOutcome, RoundRequest, Session, SessionError};
