//! `clasif-recon`: budget classification code reconciliation engine.
//!
//! Pure engine crate: reads sheets through the [`TabularSource`] seam and
//! returns missing-code records. No spreadsheet-format dependencies.

pub mod aggregate;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod entity;
pub mod error;
pub mod extract;
pub mod header;
pub mod model;
pub mod normalize;
pub mod source;

pub use aggregate::MissingCodeAggregate;
pub use config::{OutputFormat, ReconConfig, SheetDescriptor};
pub use dictionary::build_dictionary;
pub use engine::{reconcile, run_batch, run_with_dictionary, Reconciliation, RunResult};
pub use error::{LocateError, ReconError};
pub use extract::extract_codes;
pub use model::{Cell, CodeType, Dictionary, EntityId, ExtractedCodes, MissingCodeRecord, Row, StructuralWarning};
pub use source::{MemorySource, TabularSource};
