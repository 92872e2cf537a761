//! Timeline viewport and density synchronization model for reviewing dubbed
//! audio and subtitle tracks.
//!
//! All mutable state lives in [`controller::TimelineModel`]; everything else
//! in this crate is a pure derivation from a snapshot of that state plus an
//! immutable entity list.

pub mod config;
pub mod controller;
pub mod coords;
pub mod density;
pub mod domain;
pub mod entity;
pub mod error;
pub mod markers;
pub mod region;
pub mod session;
pub mod ticks;

pub use error::{Error, Result};
