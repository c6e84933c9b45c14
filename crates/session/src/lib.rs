//! Tremor Analyzer Session
//!
//! Drives one analysis session from frame capture to report. The session
//! replaces button-driven UI callbacks with explicit commands and states:
//!
//! ```text
//!          start                 stop                 analyze
//!  Idle ──────────▶ Recording ──────────▶ Idle ─────────────────▶ Analyzed
//!                       ▲                                             │
//!                       └─────────────────── start ───────────────────┘
//! ```
//!
//! Frames enter through a [`source::FrameSource`] or `push_frame`, and the
//! core locator/scorer run as plain synchronous calls during `analyze`.

pub mod session;
pub mod source;

pub use session::*;
pub use source::{FrameSource, ImageSequenceSource, VecSource};
