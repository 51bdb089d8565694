//! Intel and fog of war
//!
//! Each player keeps a private ledger of what it knows about other players'
//! military infrastructure. Knowledge arrives only through spies and
//! satellites, and every report is a snapshot: it is replaced wholesale on the
//! next gather and never tracks the target live.

mod report;
mod service;

pub use report::{IntelAsset, IntelReport};
pub use service::{clear_reports_on, gather_defense_intel, has_intel_units, report_on, GatherOutcome};
