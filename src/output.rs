//! Result of a successful conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of one finished PDF → PPTX conversion.
///
/// Serialisable so the CLI can print it with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dpi: u32,
    /// Pages produced by the rasteriser.
    pub page_count: usize,
    /// Slides written; always equal to `page_count`.
    pub slide_count: usize,
    pub slide_width_emu: i64,
    pub slide_height_emu: i64,
    /// Size of the source PDF.
    pub input_bytes: u64,
    /// Size of the written PPTX.
    pub output_bytes: u64,
    pub render_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ConversionReport {
    pub fn output_megabytes(&self) -> f64 {
        self.output_bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_to_json_with_field_names() {
        let report = ConversionReport {
            source: "a.pdf".into(),
            destination: "a.pptx".into(),
            dpi: 200,
            page_count: 3,
            slide_count: 3,
            slide_width_emu: 9_144_000,
            slide_height_emu: 5_143_500,
            input_bytes: 1024,
            output_bytes: 2 * 1024 * 1024,
            render_duration_ms: 5,
            assemble_duration_ms: 7,
            total_duration_ms: 12,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["slide_count"], 3);
        assert_eq!(json["slide_height_emu"], 5_143_500);
        assert!((report.output_megabytes() - 2.0).abs() < f64::EPSILON);
    }
}
