//! Physical statement boundary
//!
//! The executor never creates connections or statements. It receives a
//! handle per execute unit and drives exactly one of its three calls.

mod errors;
mod handle;
mod row_set;

pub use errors::SqlError;
pub use handle::{DataSourceMetadata, StatementHandle};
pub use row_set::RowSet;
