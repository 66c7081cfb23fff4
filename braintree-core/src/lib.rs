//! Braintree client core library.
//!
//! This library provides the protocol types shared by every Braintree
//! browser-switch payment flow, and the state machine that carries a flow
//! across an app switch.

pub mod authorization;
pub mod errors;
pub mod gateway;
pub mod nonce;
pub mod switch;
pub mod types;
