//! Execution module.
//!
//! This module dispatches a selected filter against an image, either
//! inline or on a background preview worker.

pub mod engine;
pub mod worker;

pub use engine::{apply, DispatchStats, Dispatcher, FilterOutput};
pub use worker::{PreviewRequest, PreviewResult, PreviewWorker};
