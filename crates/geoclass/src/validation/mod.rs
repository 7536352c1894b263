//! Consistency checks and the notices they produce.

mod checks;
mod notice;

pub use checks::{CurveCheck, CurveChecks, MassBalanceCheck, MonotonicityCheck};
pub use notice::{Evidence, Notice, NoticeKind, Severity};
