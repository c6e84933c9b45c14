pub mod analyze;
pub mod config;
pub mod score;
pub mod synth;
