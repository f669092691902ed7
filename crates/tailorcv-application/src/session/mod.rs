//! Session lifecycle orchestration.

mod manager;

pub use manager::{SessionManager, SessionPhase};
