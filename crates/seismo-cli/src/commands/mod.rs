//! CLI command implementations.

pub mod common;
pub mod design;
pub mod info;
pub mod pipelines;
pub mod process;
pub mod spectrogram;
