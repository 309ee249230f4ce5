mod expense;
mod guest;
mod ledger;
mod money;
mod tour;
mod user;

pub use expense::*;
pub use guest::*;
pub use ledger::*;
pub use money::*;
pub use tour::*;
pub use user::*;

use uuid::Uuid;

/// Generate an opaque entity id such as `tour_6f1c...`.
/// Ids are plain strings so documents written by older clients keep loading.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
