//! Case ledger domain: case lifecycle, case numbers, and evidence handling

mod case_number;
mod evidence;
mod model;
mod service;

pub use case_number::generate_case_number;
pub use evidence::{Attachment, Evidence};
pub use model::{
    parse_amount_cents, parse_money_cents, Case, CaseChanges, CaseStatus, CreateCaseRequest,
    ListCasesQuery, NewCase, ScamCategory, UpdateCaseRequest,
};
pub use service::CaseService;
pub(crate) use service::page_window;
