// Resume store: path-addressed mutation, collection operations, import and
// sample reconciliation, all persisted write-through under `resume-data`.

pub mod collection;
pub mod handlers;
pub mod import;
pub mod path;
pub mod sample;
pub mod store;

pub use store::{ResumeError, ResumeStore};
