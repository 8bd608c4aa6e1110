// src/core/mod.rs

pub mod band;
pub mod dictionary;
pub mod engine;
pub mod injection;
pub mod morph;
pub mod render;
pub mod types;
