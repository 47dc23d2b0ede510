#![warn(missing_docs)]
//! Core abstractions shared by atari-cr environments and agents.
//!
//! The crate defines the interaction interface between an agent and an
//! environment ([`Env`], [`Obs`], [`Act`], [`Step`]), seeded samplers for
//! action and observation spaces ([`space`]), key-value records for logging
//! ([`record`]) and the error type of the workspace ([`error::CrError`]).
pub mod error;
pub mod record;
pub mod space;
pub mod util;

mod base;
pub use base::{Act, Env, Info, Obs, Step};
