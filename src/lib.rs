//! Interactive timeline (Gantt) engine for agency project scheduling.
//!
//! The engine lives in [`model`]: the viewport and its navigation, the pure
//! layout function and the drag state machine. [`io`] holds the commit
//! gateway and the local item store; [`app`] and [`ui`] wire both into an
//! egui desktop shell.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod ui;

pub use error::{Result, TimelineError};
