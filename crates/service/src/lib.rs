//! Service layer holding the invoice collection and its persistence.
//! - `storage` provides the generic JSON-file-backed sequence store.
//! - `file` provides the invoice-facing operations on top of it.
//! - Clear error types; storage failures are logged, never raised.

pub mod errors;
pub mod file;
pub mod storage;
