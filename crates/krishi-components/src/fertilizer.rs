//! Fertilizer report charts, driven by report JSON embedded in the page

use krishi_charts::{CanvasId, ChartCanvas, ChartConfig, ChartError, SvgChart, fertilizer::report_charts};
use krishi_core::FertilizerReportData;
use krishi_state::use_app_state;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

/// `<script type="application/json">` element holding the report
pub const REPORT_DATA_ID: &str = "fertilizer-report-data";

/// Decode the embedded report; blank or malformed text yields `None`
pub fn parse_report(text: &str) -> Option<FertilizerReportData> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .inspect_err(|e| tracing::error!("invalid fertilizer report data: {}", e))
        .ok()
}

fn embedded_report() -> Option<FertilizerReportData> {
    let text = document().get_element_by_id(REPORT_DATA_ID)?.text_content()?;
    parse_report(&text)
}

fn canvas_config(id: CanvasId) -> ChartConfig {
    match id {
        CanvasId::SoilRadar | CanvasId::NpkPie | CanvasId::MicronutrientsPie | CanvasId::DeficiencySeverity => {
            ChartConfig::square(360.0)
        }
        _ => ChartConfig::default(),
    }
}

#[component]
pub fn FertilizerReport() -> impl IntoView {
    let charts = use_app_state().charts;
    let report_id = use_params_map().get_untracked().get("id").unwrap_or_default();
    let report = embedded_report();
    let advice = report
        .as_ref()
        .map(|r| r.special_recommendations.clone())
        .unwrap_or_default();

    if report.is_none() {
        tracing::warn!(report_id = %report_id, "no fertilizer report data on the page");
    }
    let pending = StoredValue::new(report.as_ref().map(report_charts).unwrap_or_default());

    // Canvases attach during render; draw once they exist
    Effect::new(move |_| {
        let specs = pending.get_value();
        charts.update(|registry| {
            for spec in specs {
                let canvas = spec.canvas;
                if let Err(ChartError::CanvasMissing(id)) = registry.replace(canvas, || SvgChart::new(spec)) {
                    tracing::warn!(canvas = %id, "chart canvas not found, skipping");
                }
            }
        });
    });

    view! {
        <div class="fertilizer-report">
            <h1>"Fertilizer Report #" {report_id}</h1>
            <div class="report-charts">
                {CanvasId::FERTILIZER
                    .into_iter()
                    .map(|id| view! {
                        <div class="panel">
                            <ChartCanvas id=id registry=charts config=canvas_config(id) />
                        </div>
                    })
                    .collect_view()}
            </div>
            {(!advice.is_empty()).then(|| view! {
                <ul class="special-recommendations">
                    {advice.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        assert!(parse_report("   ").is_none());
        assert!(parse_report("{not json").is_none());

        let report = parse_report(
            r#"{"soil_test_results": [{"parameter": "Nitrogen (kg/ha)", "value": 180, "status": "CRITICAL"}]}"#,
        )
        .unwrap();
        assert_eq!(report.soil_test_results.len(), 1);
        assert!(!report_charts(&report).is_empty());
    }

    #[test]
    fn test_round_charts_are_square() {
        let radar = canvas_config(CanvasId::SoilRadar);
        assert_eq!(radar.width, radar.height);
        assert!(canvas_config(CanvasId::FertilizerDose).width > canvas_config(CanvasId::FertilizerDose).height);
    }
}
