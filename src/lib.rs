//! RecoveryHub backend library
//!
//! Backend for a scam recovery service: intake submissions, recovery case
//! lifecycle with unique case numbers, per-user balance summaries that stay
//! consistent with the case set, and risk scoring.

pub mod auth;
pub mod balances;
pub mod cases;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod risk;
pub mod routes;
pub mod state;
pub mod submissions;
