//! # hs-tracking
//!
//! Experiment tracking for HyperSweep: run lifecycle types, the
//! [`TrackingClient`] seam consumed by the sweep orchestrator, and an
//! in-memory reference client.

pub mod client;
pub mod memory;
pub mod run;

pub use client::{TrackingClient, TrackingConfig};
pub use memory::InMemoryTracker;
pub use run::{Run, RunStatus};
