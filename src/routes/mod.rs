//! Route definitions for the RecoveryHub API

mod balances;
mod cases;
mod risk;
mod submissions;

pub use balances::balance_routes;
pub use cases::case_routes;
pub use risk::risk_routes;
pub use submissions::submission_routes;
