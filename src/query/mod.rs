// src/query/mod.rs
//! Read-only views over the dictionary: search, groupings and CSV export.

pub mod export;
pub mod groups;
pub mod search;

pub use export::{export_csv, ExportFilter};
pub use groups::{
    cluster_words, frequency_heatmap, pos_groups, root_family, roots_summary, wazn_groups,
    HeatmapCell, RootSummary, WaznGroup,
};
pub use search::{search, SearchHit};
