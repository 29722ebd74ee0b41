//! Fertilizer report chart builders
//!
//! Each builder takes one section of the embedded report and returns `None`
//! when that section has nothing to draw.

use crate::{colors, CanvasId, ChartKind, ChartSpec, Dataset, LegendPosition};
use krishi_core::{Deficiency, FertilizerRecommendation, ProductKind, SoilTestResult};

/// Parameters drawn on the radar and their full-scale values
const RADAR_MAXIMA: [(&str, f64); 8] = [
    ("pH", 14.0),
    ("OC (%)", 3.0),
    ("EC (dS/m)", 4.0),
    ("Nitrogen (kg/ha)", 500.0),
    ("Phosphorus (kg/ha)", 50.0),
    ("Potassium (kg/ha)", 400.0),
    ("Zinc (ppm)", 10.0),
    ("Iron (ppm)", 20.0),
];

const NPK: [&str; 3] = ["Nitrogen (kg/ha)", "Phosphorus (kg/ha)", "Potassium (kg/ha)"];
const BASIC: [&str; 3] = ["pH", "EC (dS/m)", "OC (%)"];

/// Optimal band shown in the basic properties tooltip
pub fn optimal_range(parameter: &str) -> Option<(f64, f64)> {
    if parameter.contains("pH") {
        Some((6.5, 7.5))
    } else if parameter.contains("EC") {
        Some((0.8, 1.5))
    } else if parameter.contains("OC") {
        Some((0.6, 1.0))
    } else {
        None
    }
}

/// Reading scaled to 0-100 against its full-scale value
pub fn normalized(result: &SoilTestResult) -> f64 {
    let max = RADAR_MAXIMA
        .iter()
        .find(|(name, _)| *name == result.parameter)
        .map_or(100.0, |(_, max)| *max);
    result.value / max * 100.0
}

pub fn soil_radar(results: &[SoilTestResult]) -> Option<ChartSpec> {
    let relevant: Vec<&SoilTestResult> = results
        .iter()
        .filter(|r| RADAR_MAXIMA.iter().any(|(name, _)| *name == r.parameter))
        .collect();
    if relevant.is_empty() {
        return None;
    }

    let labels = relevant.iter().map(|r| r.parameter.clone()).collect();
    let notes = relevant
        .iter()
        .map(|r| vec![format!("Value: {}", r.value), format!("Status: {}", r.status)])
        .collect();
    let points = relevant
        .iter()
        .map(|r| colors::for_parameter(&r.parameter, Some(r.status)));

    Some(
        ChartSpec::new(CanvasId::SoilRadar, ChartKind::Radar, labels)
            .dataset(
                Dataset::new("Soil Parameters", relevant.iter().map(|r| normalized(r)).collect())
                    .point_colors(points)
                    .border(colors::OPTIMAL),
            )
            .value_max(100.0)
            .notes(notes)
            .notes_only(),
    )
}

pub fn npk_pie(results: &[SoilTestResult]) -> Option<ChartSpec> {
    let npk: Vec<&SoilTestResult> = results
        .iter()
        .filter(|r| NPK.contains(&r.parameter.as_str()))
        .collect();
    if npk.is_empty() {
        return None;
    }

    let total: f64 = npk.iter().map(|r| r.value).sum();
    let notes = npk
        .iter()
        .map(|r| {
            vec![
                format!(
                    "{}: {} ({}%)",
                    r.parameter,
                    r.value,
                    crate::percent_of(r.value, total)
                ),
                format!("Status: {}", r.status),
            ]
        })
        .collect();

    pie(
        CanvasId::NpkPie,
        npk.iter().map(|r| r.parameter.replace(" (kg/ha)", "")).collect(),
        &npk,
        notes,
    )
}

/// Every reading measured in ppm
pub fn micronutrients_pie(results: &[SoilTestResult]) -> Option<ChartSpec> {
    let micro: Vec<&SoilTestResult> = results
        .iter()
        .filter(|r| r.parameter.contains("ppm"))
        .collect();
    if micro.is_empty() {
        return None;
    }

    let labels = micro.iter().map(|r| r.parameter.replace(" (ppm)", "")).collect();
    let notes = micro
        .iter()
        .map(|r| vec![format!("Status: {}", r.status)])
        .collect();

    pie(CanvasId::MicronutrientsPie, labels, &micro, notes)
}

fn pie(
    canvas: CanvasId,
    labels: Vec<String>,
    results: &[&SoilTestResult],
    notes: Vec<Vec<String>>,
) -> Option<ChartSpec> {
    let fills = results
        .iter()
        .map(|r| colors::for_parameter(&r.parameter, Some(r.status)));

    Some(
        ChartSpec::new(canvas, ChartKind::Pie, labels)
            .dataset(
                Dataset::new("", results.iter().map(|r| r.value).collect())
                    .point_colors(fills)
                    .border(colors::WHITE),
            )
            .legend(LegendPosition::Bottom)
            .notes(notes),
    )
}

/// pH, EC and OC against their optimal ranges
pub fn basic_properties(results: &[SoilTestResult]) -> Option<ChartSpec> {
    let basic: Vec<&SoilTestResult> = results
        .iter()
        .filter(|r| BASIC.contains(&r.parameter.as_str()))
        .collect();
    if basic.is_empty() {
        return None;
    }

    let labels = basic
        .iter()
        .map(|r| r.parameter.replace(" (dS/m)", "").replace(" (%)", ""))
        .collect();
    let notes = basic
        .iter()
        .map(|r| {
            let mut lines = vec![format!("Status: {}", r.status)];
            if let Some((lo, hi)) = optimal_range(&r.parameter) {
                lines.push(format!("Optimal range: {}-{}", lo, hi));
            }
            lines
        })
        .collect();
    let fills = basic
        .iter()
        .map(|r| colors::for_parameter(&r.parameter, Some(r.status)));

    Some(
        ChartSpec::new(CanvasId::BasicProperties, ChartKind::Bar, labels)
            .value_title("Value")
            .dataset(
                Dataset::new("Value", basic.iter().map(|r| r.value).collect()).point_colors(fills),
            )
            .notes(notes),
    )
}

/// Horizontal bars of deficiency amount coloured by severity
pub fn deficiency_bar(deficiencies: &[Deficiency]) -> Option<ChartSpec> {
    if deficiencies.is_empty() {
        return None;
    }

    let notes = deficiencies
        .iter()
        .map(|d| vec![format!("Severity: {}", d.severity), format!("Impact: {}", d.impact)])
        .collect();

    Some(
        ChartSpec::new(CanvasId::DeficiencyBar, ChartKind::Bar, nutrients(deficiencies))
            .horizontal()
            .value_title("Deficiency Amount (kg/ha)")
            .dataset(
                Dataset::new(
                    "Deficiency (kg/ha)",
                    deficiencies.iter().map(|d| d.deficiency).collect(),
                )
                .point_colors(deficiencies.iter().map(|d| d.severity.color())),
            )
            .notes(notes),
    )
}

/// Polar area of severity grades (OPTIMAL=1, MODERATE=2, CRITICAL=3)
pub fn deficiency_severity(deficiencies: &[Deficiency]) -> Option<ChartSpec> {
    if deficiencies.is_empty() {
        return None;
    }

    let notes = deficiencies
        .iter()
        .map(|d| {
            vec![
                format!("{}: {}", d.nutrient, d.severity),
                format!("Deficiency: {} kg/ha", d.deficiency),
                format!("Impact: {}", d.impact),
            ]
        })
        .collect();

    Some(
        ChartSpec::new(CanvasId::DeficiencySeverity, ChartKind::PolarArea, nutrients(deficiencies))
            .dataset(
                Dataset::new(
                    "",
                    deficiencies.iter().map(|d| d.severity.severity_value()).collect(),
                )
                .point_colors(
                    deficiencies
                        .iter()
                        .map(|d| colors::hex_alpha(d.severity.color(), "99")),
                ),
            )
            .value_max(3.0)
            .legend(LegendPosition::Bottom)
            .notes(notes)
            .notes_only(),
    )
}

/// Recommended dose per product, amendments and fertilizers coloured apart
pub fn fertilizer_dose(recs: &[FertilizerRecommendation]) -> Option<ChartSpec> {
    if recs.is_empty() {
        return None;
    }

    let notes = recs
        .iter()
        .map(|r| {
            vec![
                format!("Type: {}", r.kind.as_str()),
                format!("Purpose: {}", r.purpose.as_deref().unwrap_or("-")),
            ]
        })
        .collect();
    let fills = recs.iter().map(|r| match r.kind {
        ProductKind::SoilAmendment => colors::AMENDMENT_FILL,
        ProductKind::Fertilizer => colors::FERTILIZER_FILL,
    });

    Some(
        ChartSpec::new(CanvasId::FertilizerDose, ChartKind::Bar, products(recs))
            .horizontal()
            .value_title("Dose (kg/ha)")
            .dataset(
                Dataset::new(
                    "Recommended Dose (kg/ha)",
                    recs.iter().map(FertilizerRecommendation::dose_value).collect(),
                )
                .point_colors(fills),
            )
            .notes(notes),
    )
}

/// Stacked bars of nutrients covered by each product.
///
/// Falls back to a plain dose chart when no product lists coverage.
pub fn nutrient_coverage(recs: &[FertilizerRecommendation]) -> Option<ChartSpec> {
    if recs.is_empty() {
        return None;
    }

    let covering: Vec<&FertilizerRecommendation> =
        recs.iter().filter(|r| !r.covers.is_empty()).collect();

    if covering.is_empty() {
        return Some(
            ChartSpec::new(CanvasId::NutrientCoverage, ChartKind::Bar, products(recs)).dataset(
                Dataset::new(
                    "Recommended Dose",
                    recs.iter().map(FertilizerRecommendation::dose_value).collect(),
                )
                .color(colors::FERTILIZER_FILL),
            ),
        );
    }

    let mut nutrients: Vec<&str> = Vec::new();
    for rec in &covering {
        for (nutrient, _) in rec.coverage() {
            if !nutrients.contains(&nutrient) {
                nutrients.push(nutrient);
            }
        }
    }

    let labels = covering.iter().map(|r| r.product.clone()).collect();
    let mut chart = ChartSpec::new(CanvasId::NutrientCoverage, ChartKind::Bar, labels)
        .stacked()
        .value_title("Amount Covered (kg/ha)")
        .legend(LegendPosition::Bottom);

    for nutrient in nutrients {
        let data = covering
            .iter()
            .map(|rec| {
                rec.coverage()
                    .into_iter()
                    .find(|(n, _)| *n == nutrient)
                    .map_or(0.0, |(_, v)| v)
            })
            .collect();
        let color = colors::for_parameter(nutrient_name(nutrient), None);
        chart = chart.dataset(Dataset::new(nutrient, data).color(color));
    }

    Some(chart)
}

/// Every chart the report data supports
pub fn report_charts(report: &krishi_core::FertilizerReportData) -> Vec<ChartSpec> {
    let soil = &report.soil_test_results;
    let deficiencies = &report.deficiency_analysis;
    let recs = &report.fertilizer_recommendations;

    [
        soil_radar(soil),
        npk_pie(soil),
        micronutrients_pie(soil),
        basic_properties(soil),
        deficiency_bar(deficiencies),
        deficiency_severity(deficiencies),
        fertilizer_dose(recs),
        nutrient_coverage(recs),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Coverage keys are element symbols; map them onto palette names
fn nutrient_name(symbol: &str) -> &str {
    match symbol {
        "N" => "Nitrogen",
        "P" => "Phosphorus",
        "K" => "Potassium",
        "S" => "Sulphur",
        "Zn" => "Zinc",
        "Fe" => "Iron",
        "Cu" => "Copper",
        "Mn" => "Manganese",
        "B" => "Boron",
        other => other,
    }
}

fn nutrients(deficiencies: &[Deficiency]) -> Vec<String> {
    deficiencies.iter().map(|d| d.nutrient.clone()).collect()
}

fn products(recs: &[FertilizerRecommendation]) -> Vec<String> {
    recs.iter().map(|r| r.product.clone()).collect()
}
