//! Defines the data structures and models used throughout the application.
//!
//! The store holds a single entity, `User`, plus the insert payload `NewUser`
//! and the `SearchField` selector used by `search-user`.

mod user;

pub use user::*;
