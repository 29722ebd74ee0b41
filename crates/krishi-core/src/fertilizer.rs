//! Fertilizer recommendation report data
//!
//! The report page embeds this structure as JSON. Keys arrive in camelCase
//! from the page template and in snake_case from the stored report, so both
//! spellings are accepted.

use crate::colors;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").unwrap());

/// Status or severity grade attached to a soil reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SoilStatus {
    Optimal,
    Moderate,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SoilStatus {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Optimal => colors::OPTIMAL,
            Self::Moderate => colors::MODERATE,
            Self::Critical => colors::CRITICAL,
            Self::Unknown => colors::DEFAULT,
        }
    }

    /// Numeric grade for the severity polar chart
    pub fn severity_value(&self) -> f64 {
        match self {
            Self::Optimal => 1.0,
            Self::Moderate => 2.0,
            Self::Critical => 3.0,
            Self::Unknown => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Moderate => "MODERATE",
            Self::Critical => "CRITICAL",
            Self::Unknown => "N/A",
        }
    }
}

impl std::fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoilTestResult {
    pub parameter: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub status: SoilStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Deficiency {
    pub nutrient: String,
    #[serde(default)]
    pub deficiency: f64,
    #[serde(default)]
    pub severity: SoilStatus,
    #[serde(default)]
    pub impact: String,
}

/// Kind of product in a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProductKind {
    #[serde(rename = "Soil Amendment")]
    SoilAmendment,
    #[serde(other)]
    Fertilizer,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoilAmendment => "Soil Amendment",
            Self::Fertilizer => "Fertilizer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FertilizerRecommendation {
    #[serde(rename = "type")]
    pub kind: ProductKind,
    pub product: String,
    #[serde(default)]
    pub dose: Option<serde_json::Value>,
    #[serde(default)]
    pub dose_kg_ha: Option<f64>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    /// Nutrient name to amount covered; values may be numbers or text
    #[serde(default)]
    pub covers: serde_json::Map<String, serde_json::Value>,
}

impl FertilizerRecommendation {
    /// Dose in kg/ha parsed from the dose text, or the numeric dose field
    pub fn dose_value(&self) -> f64 {
        self.dose
            .as_ref()
            .map(leading_number)
            .filter(|v| *v > 0.0)
            .or(self.dose_kg_ha)
            .unwrap_or(0.0)
    }

    /// Numbers parsed from `covers`, ordered by nutrient name
    pub fn coverage(&self) -> Vec<(&str, f64)> {
        self.covers
            .iter()
            .map(|(nutrient, value)| (nutrient.as_str(), leading_number(value)))
            .collect()
    }
}

/// Embedded report driving the fertilizer charts
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FertilizerReportData {
    #[serde(default, rename = "soilTestResults", alias = "soil_test_results")]
    pub soil_test_results: Vec<SoilTestResult>,
    #[serde(default, rename = "deficiencyAnalysis", alias = "deficiency_analysis")]
    pub deficiency_analysis: Vec<Deficiency>,
    #[serde(
        default,
        rename = "fertilizerRecommendations",
        alias = "fertilizer_recommendations"
    )]
    pub fertilizer_recommendations: Vec<FertilizerRecommendation>,
    #[serde(default, rename = "specialRecommendations", alias = "special_recommendations")]
    pub special_recommendations: Vec<String>,
}

/// First number found in a JSON value; text like "250 kg/ha" yields 250
pub fn leading_number(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_leading_number(s),
        _ => 0.0,
    }
}

pub fn parse_leading_number(text: &str) -> f64 {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "soilTestResults": [
            {"parameter": "pH", "value": 6.2, "classification": "Slightly acidic", "status": "OPTIMAL"},
            {"parameter": "Zinc (ppm)", "value": 0.4, "classification": "N/A", "status": "N/A"}
        ],
        "deficiencyAnalysis": [
            {"nutrient": "N", "deficiency": 42.5, "severity": "CRITICAL", "impact": "Critical"}
        ],
        "fertilizerRecommendations": [
            {"type": "Soil Amendment", "product": "Gypsum", "dose": "250 kg/ha", "purpose": "Fix pH"},
            {"type": "Fertilizer", "product": "DAP", "dose_kg_ha": 108.7, "quantity": "2.17 Bags",
             "covers": {"N": 19.56, "P": "50.0 kg/ha"}}
        ]
    }"#;

    #[test]
    fn test_report_decodes() {
        let report: FertilizerReportData = serde_json::from_str(REPORT).unwrap();
        assert_eq!(report.soil_test_results[0].status, SoilStatus::Optimal);
        assert_eq!(report.soil_test_results[1].status, SoilStatus::Unknown);
        assert_eq!(report.deficiency_analysis[0].severity.severity_value(), 3.0);
        assert_eq!(report.fertilizer_recommendations[0].kind, ProductKind::SoilAmendment);
        assert_eq!(report.fertilizer_recommendations[1].kind, ProductKind::Fertilizer);
    }

    #[test]
    fn test_snake_case_keys() {
        let json = r#"{"deficiency_analysis": [{"nutrient": "K", "severity": "MODERATE"}]}"#;
        let report: FertilizerReportData = serde_json::from_str(json).unwrap();
        assert_eq!(report.deficiency_analysis[0].severity, SoilStatus::Moderate);
    }

    #[test]
    fn test_dose_and_coverage() {
        let report: FertilizerReportData = serde_json::from_str(REPORT).unwrap();
        let recs = &report.fertilizer_recommendations;
        assert_eq!(recs[0].dose_value(), 250.0);
        assert_eq!(recs[1].dose_value(), 108.7);
        assert_eq!(recs[1].coverage(), vec![("N", 19.56), ("P", 50.0)]);
        assert!(recs[0].coverage().is_empty());
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("apply 2.5 t/ha"), 2.5);
        assert_eq!(parse_leading_number("none"), 0.0);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(SoilStatus::Critical.color(), "#ef4444");
        assert_eq!(SoilStatus::Unknown.color(), "#6b7280");
    }
}
