//! Wire contracts shared by the office panel crates.
//!
//! Everything here is plain data plus pure functions: the access resolver,
//! list query/result types and the DTOs exchanged with the remote API.

pub mod domain;
pub mod shared;
pub mod system;
