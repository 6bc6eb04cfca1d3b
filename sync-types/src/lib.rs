//! # sync-types
//!
//! Data types shared by every userlist-sync crate:
//! - [`UserRecord`], [`Company`], [`Address`] - the records served by the remote endpoint
//! - [`Snapshot`] - an ordered list of records plus its capture timestamp
//! - [`TypesError`] - encode/decode failures for the persisted form

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod snapshot;
mod user;

pub use error::TypesError;
pub use snapshot::{format_timestamp, parse_timestamp, Snapshot};
pub use user::{Address, Company, UserRecord};
