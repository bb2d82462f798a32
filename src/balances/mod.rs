//! Per-user balance summary: amounts lost/recovered and case counts

mod model;
mod service;

pub use model::{derive_counts, BalanceSummary, CaseCounts, SetRecoveryRequest};
pub use service::BalanceService;

pub(crate) use service::recompute_summary;
