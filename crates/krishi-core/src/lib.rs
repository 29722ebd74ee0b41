//! # krishi-core
//!
//! Core domain types for the Krishi Mitra web client.
//! Wire types mirror the backend JSON contracts; formatting goes through
//! small strategy traits so views can swap presentation without touching data.

pub mod chat;
pub mod error;
pub mod fertilizer;
pub mod i18n;
pub mod mandi;
pub mod markup;
pub mod soil;

pub use chat::*;
pub use error::*;
pub use fertilizer::*;
pub use i18n::*;
pub use mandi::*;
pub use markup::*;
pub use soil::*;

/// Largest soil report accepted for upload (10 MiB)
pub const MAX_REPORT_BYTES: f64 = 10.0 * 1024.0 * 1024.0;

/// Characters of the last message shown in a chat history preview
pub const PREVIEW_CHARS: usize = 50;

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for price formatting
pub trait PriceFormatter: Send + Sync {
    fn format(&self, price: f64) -> String;
}

/// Strategy trait for measured soil values
pub trait MeasurementFormatter: Send + Sync {
    fn format(&self, value: Option<f64>) -> String;
}

/// Rupee price formatter used by the mandi table and tooltips
#[derive(Debug, Clone, Default)]
pub struct RupeeFormatter;

impl PriceFormatter for RupeeFormatter {
    fn format(&self, price: f64) -> String {
        if price.fract() == 0.0 {
            format!("₹{}", price as i64)
        } else {
            format!("₹{}", price)
        }
    }
}

/// Two-decimal measurement with an optional unit suffix.
///
/// A missing or zero reading renders as `N/A`.
#[derive(Debug, Clone)]
pub struct UnitFormatter {
    pub suffix: &'static str,
}

impl UnitFormatter {
    pub const fn new(suffix: &'static str) -> Self {
        Self { suffix }
    }

    pub const fn plain() -> Self {
        Self { suffix: "" }
    }
}

impl MeasurementFormatter for UnitFormatter {
    fn format(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v != 0.0 => format!("{:.2}{}", v, self.suffix),
            _ => "N/A".to_string(),
        }
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    /// Doughnut palette for commodity distribution
    pub const SERIES: [&str; 15] = [
        "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8BC34A", "#E91E63",
        "#00BCD4", "#FFC107", "#9C27B0", "#CDDC39", "#FF5722", "#607D8B", "#795548",
    ];

    pub const AVERAGE_BAR: &str = "#36A2EB";
    pub const AVERAGE_BORDER: &str = "#2196F3";
    pub const RANGE_FILL: &str = "rgba(54, 162, 235, 0.5)";
    pub const RANGE_BORDER: &str = "rgb(54, 162, 235)";
    pub const MIN_PRICE: &str = "#4BC0C0";
    pub const MAX_PRICE: &str = "#FF6384";

    pub const OPTIMAL: &str = "#10b981";
    pub const MODERATE: &str = "#f59e0b";
    pub const CRITICAL: &str = "#ef4444";
    pub const DEFAULT: &str = "#6b7280";

    pub const AMENDMENT_FILL: &str = "rgba(16, 185, 129, 0.7)";
    pub const AMENDMENT_BORDER: &str = "rgb(16, 185, 129)";
    pub const FERTILIZER_FILL: &str = "rgba(59, 130, 246, 0.7)";
    pub const FERTILIZER_BORDER: &str = "rgb(59, 130, 246)";
    pub const RADAR_FILL: &str = "rgba(16, 185, 129, 0.2)";

    pub const BG_PANEL: &str = "#ffffff";
    pub const GRID: &str = "#e5e7eb";
    pub const TEXT_PRIMARY: &str = "#1f2937";
    pub const TEXT_MUTED: &str = "#6b7280";
    pub const WHITE: &str = "#ffffff";

    /// Nutrient name fragments and their fixed colour, matched in order
    const NUTRIENTS: [(&str, &str); 12] = [
        ("Nitrogen", "#4ade80"),
        ("Phosphorus", "#60a5fa"),
        ("Potassium", "#f472b6"),
        ("Zinc", "#a78bfa"),
        ("Iron", "#fb923c"),
        ("Copper", "#a1a1aa"),
        ("Manganese", "#fbbf24"),
        ("Sulphur", "#2dd4bf"),
        ("Boron", "#94a3b8"),
        ("pH", "#475569"),
        ("EC", "#0ea5e9"),
        ("OC", "#84cc16"),
    ];

    /// Colour for a soil parameter name such as `"Zinc (ppm)"`
    pub fn nutrient(parameter: &str) -> Option<&'static str> {
        NUTRIENTS
            .iter()
            .find(|(name, _)| parameter.contains(name))
            .map(|(_, color)| *color)
    }

    /// Nutrient colour, else status colour, else the default grey
    pub fn for_parameter(parameter: &str, status: Option<crate::SoilStatus>) -> &'static str {
        nutrient(parameter).unwrap_or_else(|| status.map_or(DEFAULT, |s| s.color()))
    }

    /// Append a two-digit hex alpha to a `#rrggbb` colour
    pub fn hex_alpha(hex: &str, alpha: &str) -> String {
        format!("{}{}", hex, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_formatter() {
        let formatter = RupeeFormatter;
        assert_eq!(formatter.format(2150.0), "₹2150");
        assert_eq!(formatter.format(2150.5), "₹2150.5");
    }

    #[test]
    fn test_unit_formatter() {
        let kg = UnitFormatter::new(" kg/ha");
        assert_eq!(kg.format(Some(280.456)), "280.46 kg/ha");
        assert_eq!(kg.format(None), "N/A");
        assert_eq!(kg.format(Some(0.0)), "N/A");
        assert_eq!(UnitFormatter::plain().format(Some(7.1)), "7.10");
    }

    #[test]
    fn test_nutrient_colors() {
        assert_eq!(colors::nutrient("Zinc (ppm)"), Some("#a78bfa"));
        assert_eq!(colors::nutrient("Nitrogen (kg/ha)"), Some("#4ade80"));
        assert_eq!(colors::nutrient("Calcium"), None);
        assert_eq!(
            colors::for_parameter("Calcium", Some(SoilStatus::Critical)),
            colors::CRITICAL
        );
        assert_eq!(colors::for_parameter("Calcium", None), colors::DEFAULT);
    }
}
