//! Common types used across the Braintree client.

mod address;
mod common;
mod metadata;

pub use address::*;
pub use common::*;
pub use metadata::*;
