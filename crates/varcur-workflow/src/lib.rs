//! Workflow orchestration for interpretations.
//!
//! An [`InterpretationSession`] collects a curator's drafts and turns them into
//! save, finalize-allele, mark-review, finalize and reopen calls against a
//! [`Backend`].

pub mod backend;
pub mod error;
pub mod payload;
pub mod session;
pub mod toast;

pub use backend::{Backend, Collision, WorkflowTarget};
pub use error::{Result, WorkflowError};
pub use payload::{
    AllelePayloads, assemble_allele_payloads, build_finalize_allele_payload,
    build_workflow_payload,
};
pub use session::InterpretationSession;
pub use toast::{Toast, ToastLevel};
