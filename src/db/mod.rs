//! Provides database interaction functionalities.
//!
//! `sqlite` owns the connection pool; `session` wraps a single scoped transaction
//! and carries every query the commands need.

mod session;
mod sqlite;

pub use session::*;
pub use sqlite::*;
