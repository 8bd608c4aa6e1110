// src/core/band.rs

/// Band assigned to words with no corpus occurrences or no dictionary link.
pub const RAREST_BAND: u8 = 5;

/// Buckets a corpus occurrence count into 1 (ultra-frequent) ..= 5 (rare).
pub fn frequency_band(count: u32) -> u8 {
    match count {
        1000.. => 1,
        200.. => 2,
        50.. => 3,
        10.. => 4,
        _ => RAREST_BAND,
    }
}

/// CSS class used by the heat map view.
pub fn heatmap_class(band: u8) -> String {
    format!("freq-{band}")
}
