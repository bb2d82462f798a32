//! API handlers

mod balances;
mod cases;
mod risk;
mod submissions;

pub use balances::*;
pub use cases::*;
pub use risk::*;
pub use submissions::*;
