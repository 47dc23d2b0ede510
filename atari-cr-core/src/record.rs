//! Types and traits for recording values during training and evaluation.
//!
//! Environments return a [`Record`] from every step (for example the fovea
//! location and whether the step was a pause), and agents write records of
//! episode statistics and evaluation results to a [`Recorder`].
//!
//! ```rust
//! use atari_cr_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("charts/episodic_return", 3.0);
//! record.insert("env", RecordValue::String("breakout".to_string()));
//! assert_eq!(record.get_scalar("charts/episodic_return").unwrap(), 3.0);
//! ```
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::{NullRecorder, Recorder};
