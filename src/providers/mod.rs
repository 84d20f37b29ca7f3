//! Inference server wire formats

pub mod ollama;
