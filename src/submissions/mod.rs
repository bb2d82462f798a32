//! Pre-case intake submissions and their promotion into cases

mod model;
mod service;

pub use model::{
    CreateSubmissionRequest, ListSubmissionsQuery, NewSubmission, Submission, SubmissionStatus,
    UpdateSubmissionRequest,
};
pub use service::SubmissionService;
