pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use application::AgencyService;
pub use domain::*;
pub use storage::{BlobStore, MemoryBlobStore, SqliteBlobStore};
