// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod learning;
pub mod levels;
pub mod persistence;
pub mod query;

pub use crate::config::{InjectionSettings, LabConfig, RenderRequest, SettingsRequest};
pub use crate::core::dictionary::Dictionary;
pub use crate::core::engine::QuranLab;
pub use crate::error::{LabError, Result};
pub use crate::learning::{ExposureTracker, FamiliarityStats};
