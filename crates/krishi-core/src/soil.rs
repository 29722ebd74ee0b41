//! Soil report analysis types

use crate::{Language, MeasurementFormatter, Text, UnitFormatter};
use serde::{Deserialize, Serialize};

/// Parameters extracted from a soil health card.
///
/// Unknown keys sent by the backend are kept in `extra` so the completion
/// request echoes them back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_carbon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zinc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manganese: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sulphur: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One formatted line of the soil parameter panel
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    pub label: &'static str,
    pub value: String,
}

const PLAIN: UnitFormatter = UnitFormatter::plain();
const PERCENT: UnitFormatter = UnitFormatter::new("%");
const KG_HA: UnitFormatter = UnitFormatter::new(" kg/ha");
const PPM: UnitFormatter = UnitFormatter::new(" ppm");

impl SoilParams {
    /// Display rows in panel order with localized labels
    pub fn rows(&self, lang: Language) -> Vec<ParamRow> {
        let entries: [(Text, Option<f64>, &UnitFormatter); 11] = [
            (Text::PhLabel, self.ph, &PLAIN),
            (Text::EcLabel, self.ec, &PLAIN),
            (Text::OcLabel, self.organic_carbon, &PERCENT),
            (Text::NitrogenLabel, self.nitrogen, &KG_HA),
            (Text::PhosphorusLabel, self.phosphorus, &KG_HA),
            (Text::PotassiumLabel, self.potassium, &KG_HA),
            (Text::ZincLabel, self.zinc, &PPM),
            (Text::CopperLabel, self.copper, &PPM),
            (Text::IronLabel, self.iron, &PPM),
            (Text::ManganeseLabel, self.manganese, &PPM),
            (Text::SulphurLabel, self.sulphur, &PPM),
        ];

        entries
            .into_iter()
            .map(|(label, value, formatter)| ParamRow {
                label: label.get(lang),
                value: formatter.format(value),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Location {
    pub fn district_known(&self) -> bool {
        self.district.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    pub fn state_known(&self) -> bool {
        self.state.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn district_label(&self) -> &str {
        self.district.as_deref().filter(|d| !d.is_empty()).unwrap_or("N/A")
    }

    pub fn state_label(&self) -> &str {
        self.state.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub fertilizer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FertilizerSchedule {
    #[serde(default)]
    pub unirrigated: String,
    #[serde(default)]
    pub irrigated_early: String,
    #[serde(default)]
    pub irrigated_late: String,
}

/// Variety detail card shown in the results carousel
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CropVariety {
    pub variety_name: String,
    #[serde(default, rename = "yield")]
    pub yield_: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub maturity_days: String,
    #[serde(default)]
    pub key_traits: String,
    #[serde(default)]
    pub soil_requirements: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ph: String,
    #[serde(default)]
    pub sowing_time: String,
    #[serde(default)]
    pub harvesting_time: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub irrigation_schedule: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub seed_rate: String,
    #[serde(default)]
    pub fertilizer: FertilizerSchedule,
}

impl CropVariety {
    /// (label, value) pairs for the details grid
    pub fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Soil Type", self.soil_requirements.clone()),
            ("pH Range", self.ph.clone()),
            ("Sowing", self.sowing_time.clone()),
            ("Harvesting", self.harvesting_time.clone()),
            ("Irrigation", format!("Every {} days", self.irrigation_schedule)),
            ("Seed Rate", format!("{} kg/acre", self.seed_rate)),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CropVarieties {
    pub crop_name: String,
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub varieties: Vec<CropVariety>,
}

impl CropVarieties {
    pub fn heading(&self) -> String {
        format!("{} Recommended Varieties", self.crop_name.to_uppercase())
    }

    pub fn has_varieties(&self) -> bool {
        self.found && !self.varieties.is_empty()
    }

    pub fn not_found_notice(&self) -> String {
        format!(
            "No specific varieties found for {}. Please consult your local agricultural extension for recommendations.",
            self.crop_name
        )
    }
}

/// Response of both soil analysis endpoints
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SoilAnalysis {
    #[serde(default)]
    pub soil_params: SoilParams,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(default)]
    pub crop_varieties: Option<CropVarieties>,
    #[serde(default)]
    pub missing_location: bool,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub soil_report_id: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SoilAnalysis {
    pub fn fertilizer_report_href(&self) -> Option<String> {
        self.soil_report_id
            .as_ref()
            .map(|id| format!("/fertilizer_report/{}", id))
    }
}

/// JSON body for `/api/complete_soil_analysis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteAnalysisRequest {
    pub soil_params: SoilParams,
    pub district: String,
    pub state: String,
    pub language: Language,
    pub report_path: String,
}

// ============================================================================
// REPORT PREVIEW
// ============================================================================

/// How a selected report file is previewed before upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Image,
    Pdf,
    Word,
    Excel,
    Other,
}

impl ReportKind {
    /// Classify by MIME type first, then by file extension
    pub fn detect(mime: &str, file_name: &str) -> Self {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if mime.starts_with("image/") {
            Self::Image
        } else if mime == "application/pdf" || ext == "pdf" {
            Self::Pdf
        } else if matches!(
            mime,
            "application/msword"
                | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ) || matches!(ext.as_str(), "doc" | "docx")
        {
            Self::Word
        } else if matches!(
            mime,
            "application/vnd.ms-excel"
                | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ) || matches!(ext.as_str(), "xls" | "xlsx")
        {
            Self::Excel
        } else {
            Self::Other
        }
    }

    /// Static icon for non-image documents
    pub fn icon(&self) -> Option<&'static str> {
        match self {
            Self::Image => None,
            Self::Pdf => Some("/static/images/pdf_icon.png"),
            Self::Word => Some("/static/images/word_icon.png"),
            Self::Excel => Some("/static/images/excel_icon.png"),
            Self::Other => Some("/static/images/file_icon.png"),
        }
    }
}

/// File name used for photos taken with the camera
pub const CAPTURED_IMAGE_NAME: &str = "captured_image.jpg";

/// Camera facing mode for `getUserMedia`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::User => "user",
        }
    }

    pub fn flip(&self) -> Self {
        match self {
            Self::Environment => Self::User,
            Self::User => Self::Environment,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_rows_format_units() {
        let params = SoilParams {
            ph: Some(7.234),
            organic_carbon: Some(0.5),
            nitrogen: Some(280.0),
            zinc: Some(0.0),
            ..Default::default()
        };
        let rows = params.rows(Language::English);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].value, "7.23");
        assert_eq!(rows[1].value, "N/A");
        assert_eq!(rows[2].value, "0.50%");
        assert_eq!(rows[3].value, "280.00 kg/ha");
        assert_eq!(rows[6].value, "N/A");
    }

    #[test]
    fn test_missing_location_response() {
        let json = r#"{
            "soil_params": {"ph": 6.8, "boron": 0.4},
            "location": {"district": "Pune", "state": null},
            "missing_location": true,
            "report_path": "uploads/r1.pdf"
        }"#;
        let analysis: SoilAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.missing_location);
        assert!(analysis.location.district_known());
        assert!(!analysis.location.state_known());
        assert_eq!(analysis.soil_params.ph, Some(6.8));
        assert!(analysis.soil_params.extra.contains_key("boron"));
        assert_eq!(analysis.report_path.as_deref(), Some("uploads/r1.pdf"));
    }

    #[test]
    fn test_complete_request_echoes_params() {
        let mut params = SoilParams { ph: Some(6.5), ..Default::default() };
        params.extra.insert("boron".into(), serde_json::json!(0.4));
        let req = CompleteAnalysisRequest {
            soil_params: params,
            district: "Pune".into(),
            state: "Maharashtra".into(),
            language: Language::Hindi,
            report_path: "uploads/r1.pdf".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["soil_params"]["ph"], 6.5);
        assert_eq!(json["soil_params"]["boron"], 0.4);
        assert!(json["soil_params"].get("ec").is_none());
        assert_eq!(json["language"], "hindi");
    }

    #[test]
    fn test_report_id_and_varieties() {
        let json = r#"{
            "soil_report_id": 17,
            "recommendations": {"crops": ["wheat", "gram"], "fertilizer": "Apply urea"},
            "crop_varieties": {"crop_name": "wheat", "found": true, "varieties": [
                {"variety_name": "HD 2967", "yield": "45 q/ha", "maturity_days": 140,
                 "seed_rate": 40, "irrigation_schedule": "20"}
            ]}
        }"#;
        let analysis: SoilAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.fertilizer_report_href().as_deref(), Some("/fertilizer_report/17"));
        let varieties = analysis.crop_varieties.unwrap();
        assert_eq!(varieties.heading(), "WHEAT Recommended Varieties");
        assert!(varieties.has_varieties());
        let details = varieties.varieties[0].details();
        assert_eq!(details[4].1, "Every 20 days");
        assert_eq!(details[5].1, "40 kg/acre");
        assert_eq!(varieties.varieties[0].maturity_days, "140");
    }

    #[test]
    fn test_report_kind_detection() {
        assert_eq!(ReportKind::detect("image/png", "card.png"), ReportKind::Image);
        assert_eq!(ReportKind::detect("", "card.PDF"), ReportKind::Pdf);
        assert_eq!(ReportKind::detect("application/msword", "x"), ReportKind::Word);
        assert_eq!(ReportKind::detect("", "sheet.xlsx"), ReportKind::Excel);
        assert_eq!(ReportKind::detect("text/plain", "notes.txt"), ReportKind::Other);
        assert_eq!(ReportKind::Other.icon(), Some("/static/images/file_icon.png"));
    }

    #[test]
    fn test_facing_mode_flip() {
        assert_eq!(FacingMode::default().as_str(), "environment");
        assert_eq!(FacingMode::Environment.flip(), FacingMode::User);
    }
}
