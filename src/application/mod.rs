// Application layer: use cases over the stored document.
// Every operation loads the current document, acts on it and, for mutations,
// writes it back in one save. Financial figures come from `domain::ledger`.

pub mod error;
pub mod insight;
pub mod reporting;
pub mod service;

pub use error::*;
pub use insight::*;
pub use reporting::*;
pub use service::*;
