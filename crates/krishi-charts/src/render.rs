//! SVG renderers for `ChartSpec`
//!
//! Geometry is computed by plain functions (`bar_marks`, `arc_marks`,
//! `radar_layout`) so it can be checked without a browser; the components
//! only turn marks into SVG nodes.

use crate::{
    BarLayout, CanvasId, ChartDimensions, ChartInstance, ChartKind, ChartMargin, ChartRegistry,
    ChartSpec, LegendPosition, Orientation,
    chartkit::{arc_path, format_axis_value, polar_point, polygon_path, slice_angles, Bands, Scale, ValueScale},
    colors,
};
use leptos::prelude::*;
use std::f64::consts::TAU;
use tracing::trace;

// ============================================================================
// CHART HANDLE
// ============================================================================

/// Chart bound to a canvas slot in the registry
#[derive(Debug, Clone)]
pub struct SvgChart {
    pub spec: ChartSpec,
}

impl SvgChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self { spec }
    }
}

impl ChartInstance for SvgChart {
    fn destroy(&mut self) {
        trace!(canvas = %self.spec.canvas, "chart destroyed");
        self.spec.datasets.clear();
    }
}

/// Registry type shared by the pages
pub type SvgRegistry = ChartRegistry<SvgChart>;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
        }
    }
}

impl ChartConfig {
    pub fn square(size: f64) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    fn dimensions(&self, spec: &ChartSpec) -> ChartDimensions {
        let margin = match (spec.kind, spec.orientation) {
            (ChartKind::Bar, Orientation::Vertical) => ChartMargin::new(16.0, 16.0, 80.0, 64.0),
            (ChartKind::Bar, Orientation::Horizontal) => ChartMargin::new(16.0, 24.0, 48.0, 120.0),
            _ => ChartMargin::uniform(24.0),
        };
        ChartDimensions::new(self.width, self.height).with_margin(margin)
    }
}

// ============================================================================
// BAR GEOMETRY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: Option<String>,
    pub tooltip: String,
}

/// Category positions along the band axis
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTick {
    pub position: f64,
    pub label: String,
}

/// Rectangles for every (dataset, category) value, in inner-area coordinates
pub fn bar_marks(spec: &ChartSpec, dims: &ChartDimensions) -> Vec<BarMark> {
    let horizontal = spec.orientation == Orientation::Horizontal;
    let (band_len, value_len) = if horizontal {
        (dims.inner_height(), dims.inner_width())
    } else {
        (dims.inner_width(), dims.inner_height())
    };

    let band = Bands::across(spec.labels.len(), band_len);
    let value = value_scale(spec, value_len);
    let series = spec.datasets.len().max(1);
    let stacked = spec.layout == BarLayout::Stacked;
    let slot = if stacked {
        band.width()
    } else {
        band.width() / series as f64
    };

    let mut marks = Vec::new();
    let mut offsets = vec![0.0; spec.labels.len()];

    for (s, dataset) in spec.datasets.iter().enumerate() {
        for (i, raw) in dataset.data.iter().enumerate().take(spec.labels.len()) {
            let v = raw.max(0.0);
            let base = if stacked { offsets[i] } else { 0.0 };
            let length = value.scale(base + v) - value.scale(base);
            let start = value.scale(base);
            if stacked {
                offsets[i] += v;
            }

            let band_pos = band.start(i) + if stacked { 0.0 } else { s as f64 * slot };
            let (x, y, width, height) = if horizontal {
                (start, band_pos, length, slot)
            } else {
                (band_pos, value_len - start - length, slot, length)
            };

            marks.push(BarMark {
                x,
                y,
                width,
                height,
                fill: dataset.fill_at(i).to_string(),
                stroke: dataset.border.clone(),
                tooltip: spec.tooltip(s, i),
            });
        }
    }

    marks
}

/// Centre of each category band
pub fn category_ticks(spec: &ChartSpec, band_len: f64) -> Vec<CategoryTick> {
    let band = Bands::across(spec.labels.len(), band_len);
    spec.labels
        .iter()
        .enumerate()
        .map(|(i, label)| CategoryTick {
            position: band.center(i),
            label: label.clone(),
        })
        .collect()
}

fn value_scale(spec: &ChartSpec, length: f64) -> ValueScale {
    let extent = spec.value_extent();
    if spec.value_axis.max.is_some() {
        ValueScale::pinned(extent, length)
    } else {
        ValueScale::rounded(extent, length)
    }
}

// ============================================================================
// ARC GEOMETRY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ArcMark {
    pub path: String,
    pub fill: String,
    pub stroke: Option<String>,
    pub tooltip: String,
}

/// Slices for doughnut, pie and polar area charts
pub fn arc_marks(spec: &ChartSpec, cx: f64, cy: f64, radius: f64) -> Vec<ArcMark> {
    let Some(dataset) = spec.datasets.first() else {
        return Vec::new();
    };
    let values: Vec<f64> = dataset.data.iter().take(spec.labels.len()).copied().collect();

    let slices: Vec<(f64, f64, f64)> = match spec.kind {
        ChartKind::PolarArea => {
            let max = spec.value_extent().max(f64::EPSILON);
            let sweep = TAU / values.len().max(1) as f64;
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let start = i as f64 * sweep;
                    (start, start + sweep, radius * (v / max).clamp(0.0, 1.0))
                })
                .collect()
        }
        _ => slice_angles(&values)
            .into_iter()
            .map(|(start, end)| (start, end, radius))
            .collect(),
    };

    let inner = if spec.kind == ChartKind::Doughnut {
        radius * 0.55
    } else {
        0.0
    };

    slices
        .into_iter()
        .enumerate()
        .filter(|(_, (start, end, outer))| end > start && *outer > inner)
        .map(|(i, (start, end, outer))| ArcMark {
            path: arc_path(cx, cy, inner, outer, start, end),
            fill: dataset.fill_at(i).to_string(),
            stroke: dataset.border.clone().or_else(|| Some(colors::WHITE.to_string())),
            tooltip: spec.tooltip(0, i),
        })
        .collect()
}

// ============================================================================
// RADAR GEOMETRY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RadarPoint {
    pub x: f64,
    pub y: f64,
    pub fill: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLabel {
    pub x: f64,
    pub y: f64,
    pub anchor: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    pub rings: Vec<String>,
    pub spokes: Vec<(f64, f64)>,
    pub area: String,
    pub points: Vec<RadarPoint>,
    pub labels: Vec<RadarLabel>,
}

pub fn radar_layout(spec: &ChartSpec, cx: f64, cy: f64, radius: f64) -> RadarLayout {
    let n = spec.labels.len();
    let max = spec.value_extent().max(f64::EPSILON);
    let angle = |i: usize| i as f64 * TAU / n.max(1) as f64;

    let rings = (1..=4)
        .map(|step| {
            let r = radius * step as f64 / 4.0;
            let ring: Vec<(f64, f64)> = (0..n).map(|i| polar_point(cx, cy, r, angle(i))).collect();
            polygon_path(&ring)
        })
        .collect();

    let spokes = (0..n).map(|i| polar_point(cx, cy, radius, angle(i))).collect();

    let (area, points) = match spec.datasets.first() {
        Some(dataset) => {
            let positions: Vec<(f64, f64)> = (0..n)
                .map(|i| {
                    let v = dataset.data.get(i).copied().unwrap_or_default();
                    polar_point(cx, cy, radius * (v / max).clamp(0.0, 1.0), angle(i))
                })
                .collect();
            let points = positions
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| RadarPoint {
                    x,
                    y,
                    fill: dataset.fill_at(i).to_string(),
                    tooltip: spec.tooltip(0, i),
                })
                .collect();
            (polygon_path(&positions), points)
        }
        None => (String::new(), Vec::new()),
    };

    let labels = spec
        .labels
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let a = angle(i);
            let (x, y) = polar_point(cx, cy, radius + 14.0, a);
            let anchor = match a.sin() {
                s if s > 0.1 => "start",
                s if s < -0.1 => "end",
                _ => "middle",
            };
            RadarLabel { x, y, anchor, text: text.clone() }
        })
        .collect();

    RadarLayout { rings, spokes, area, points, labels }
}

// ============================================================================
// COMPONENTS
// ============================================================================

/// Chart slot bound to the registry for its whole lifetime.
///
/// Mounting attaches `id`; unmounting detaches it and destroys its chart.
#[component]
pub fn ChartCanvas(
    id: CanvasId,
    registry: RwSignal<SvgRegistry>,
    #[prop(optional)] config: Option<ChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();

    registry.update_untracked(|r| r.attach(id));
    on_cleanup(move || {
        registry.try_update(|r| r.detach(id));
    });

    let spec = move || registry.with(|r| r.get(id).map(|chart| chart.spec.clone()));

    view! {
        <div id=id.dom_id() class="chart-canvas">
            {move || spec().map(|spec| view! { <ChartView spec=spec config=config /> })}
        </div>
    }
}

/// Draw one chart
#[component]
pub fn ChartView(spec: ChartSpec, #[prop(optional)] config: Option<ChartConfig>) -> impl IntoView {
    let config = config.unwrap_or_default();
    let hovered = RwSignal::new(None::<String>);
    let title = spec.title.clone();
    let legend = legend_entries(&spec);
    let legend_class = match spec.legend {
        LegendPosition::Top => "chart-legend chart-legend-top",
        LegendPosition::Right => "chart-legend chart-legend-right",
        _ => "chart-legend chart-legend-bottom",
    };

    let body = match spec.kind {
        ChartKind::Bar => view! { <BarChart spec=spec config=config hovered=hovered /> }.into_any(),
        ChartKind::Radar => view! { <RadarChart spec=spec config=config hovered=hovered /> }.into_any(),
        ChartKind::Doughnut | ChartKind::Pie | ChartKind::PolarArea => {
            view! { <ArcChart spec=spec config=config hovered=hovered /> }.into_any()
        }
    };

    view! {
        <figure class="chart">
            {title.map(|t| view! { <figcaption class="chart-title">{t}</figcaption> })}
            <div class="chart-body" style="position: relative;">
                {body}
                <Show when=move || hovered.with(Option::is_some)>
                    <div class="chart-tooltip" style="white-space: pre-line;">
                        {move || hovered.get().unwrap_or_default()}
                    </div>
                </Show>
            </div>
            {(!legend.is_empty()).then(|| view! {
                <ul class=legend_class>
                    {legend.into_iter().map(|(label, color)| view! {
                        <li>
                            <span class="chart-legend-swatch" style=format!("background: {};", color)></span>
                            {label}
                        </li>
                    }).collect_view()}
                </ul>
            })}
        </figure>
    }
}

/// (label, colour) pairs shown under the chart
pub fn legend_entries(spec: &ChartSpec) -> Vec<(String, String)> {
    if spec.legend == LegendPosition::Hidden {
        return Vec::new();
    }

    match spec.kind {
        ChartKind::Bar | ChartKind::Radar => spec
            .datasets
            .iter()
            .map(|d| (d.label.clone(), d.fill_at(0).to_string()))
            .collect(),
        _ => spec
            .datasets
            .first()
            .map(|d| {
                spec.labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| (label.clone(), d.fill_at(i).to_string()))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[component]
fn BarChart(spec: ChartSpec, config: ChartConfig, hovered: RwSignal<Option<String>>) -> impl IntoView {
    let dims = config.dimensions(&spec);
    let horizontal = spec.orientation == Orientation::Horizontal;
    let marks = bar_marks(&spec, &dims);

    let (band_len, value_len) = if horizontal {
        (dims.inner_height(), dims.inner_width())
    } else {
        (dims.inner_width(), dims.inner_height())
    };
    let scale = value_scale(&spec, value_len);
    let ticks = scale.ticks();
    let categories = category_ticks(&spec, band_len);
    let axis_title = spec.value_axis.title.clone();
    let inner_w = dims.inner_width();
    let inner_h = dims.inner_height();

    view! {
        <svg
            class="bar-chart"
            viewBox=dims.viewbox()
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: 100%;"
        >
            <g transform=dims.inner_transform()>
                // Value grid and tick labels
                {ticks.into_iter().map(|tick| {
                    let p = scale.scale(tick);
                    let label = format_axis_value(tick);
                    if horizontal {
                        view! {
                            <g transform=format!("translate({}, 0)", p)>
                                <line y1="0" y2=inner_h stroke=colors::GRID />
                                <text y=inner_h + 14.0 text-anchor="middle" fill=colors::TEXT_MUTED font-size="10">
                                    {label}
                                </text>
                            </g>
                        }.into_any()
                    } else {
                        view! {
                            <g transform=format!("translate(0, {})", inner_h - p)>
                                <line x1="0" x2=inner_w stroke=colors::GRID />
                                <text x="-6" dy="0.32em" text-anchor="end" fill=colors::TEXT_MUTED font-size="10">
                                    {label}
                                </text>
                            </g>
                        }.into_any()
                    }
                }).collect_view()}

                // Bars
                {marks.into_iter().map(|mark| {
                    let tip = mark.tooltip.clone();
                    view! {
                        <rect
                            x=mark.x
                            y=mark.y
                            width=mark.width.max(0.0)
                            height=mark.height.max(0.0)
                            fill=mark.fill
                            stroke=mark.stroke.unwrap_or_else(|| "none".to_string())
                            stroke-width="1"
                            on:mouseenter=move |_| hovered.set(Some(tip.clone()))
                            on:mouseleave=move |_| hovered.set(None)
                        />
                    }
                }).collect_view()}

                // Category labels
                {categories.into_iter().map(|tick| {
                    if horizontal {
                        view! {
                            <text
                                x="-6"
                                y=tick.position
                                dy="0.32em"
                                text-anchor="end"
                                fill=colors::TEXT_PRIMARY
                                font-size="11"
                            >
                                {tick.label}
                            </text>
                        }.into_any()
                    } else {
                        view! {
                            <text
                                transform=format!("translate({}, {}) rotate(-45)", tick.position, inner_h + 10.0)
                                text-anchor="end"
                                fill=colors::TEXT_PRIMARY
                                font-size="11"
                            >
                                {tick.label}
                            </text>
                        }.into_any()
                    }
                }).collect_view()}

                // Value axis title
                {axis_title.map(|title| {
                    if horizontal {
                        view! {
                            <text x=inner_w / 2.0 y=inner_h + 36.0 text-anchor="middle" fill=colors::TEXT_MUTED font-size="12">
                                {title}
                            </text>
                        }.into_any()
                    } else {
                        view! {
                            <text
                                transform=format!("translate(-48, {}) rotate(-90)", inner_h / 2.0)
                                text-anchor="middle"
                                fill=colors::TEXT_MUTED
                                font-size="12"
                            >
                                {title}
                            </text>
                        }.into_any()
                    }
                })}
            </g>
        </svg>
    }
}

#[component]
fn ArcChart(spec: ChartSpec, config: ChartConfig, hovered: RwSignal<Option<String>>) -> impl IntoView {
    let dims = config.dimensions(&spec);
    let cx = dims.width / 2.0;
    let cy = dims.height / 2.0;
    let radius = dims.inner_width().min(dims.inner_height()) / 2.0;
    let polar = spec.kind == ChartKind::PolarArea;
    let marks = arc_marks(&spec, cx, cy, radius);

    let rings = polar.then(|| {
        (1..=3)
            .map(|step| {
                view! {
                    <circle cx=cx cy=cy r=radius * step as f64 / 3.0 fill="none" stroke=colors::GRID />
                }
            })
            .collect_view()
    });

    view! {
        <svg
            class="arc-chart"
            viewBox=dims.viewbox()
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: 100%;"
        >
            {rings}
            {marks.into_iter().map(|mark| {
                let tip = mark.tooltip.clone();
                view! {
                    <path
                        d=mark.path
                        fill=mark.fill
                        stroke=mark.stroke.unwrap_or_else(|| "none".to_string())
                        stroke-width="2"
                        on:mouseenter=move |_| hovered.set(Some(tip.clone()))
                        on:mouseleave=move |_| hovered.set(None)
                    />
                }
            }).collect_view()}
        </svg>
    }
}

#[component]
fn RadarChart(spec: ChartSpec, config: ChartConfig, hovered: RwSignal<Option<String>>) -> impl IntoView {
    let dims = config.dimensions(&spec);
    let cx = dims.width / 2.0;
    let cy = dims.height / 2.0;
    // leave room for the axis labels
    let radius = (dims.inner_width().min(dims.inner_height()) / 2.0 - 24.0).max(10.0);
    let layout = radar_layout(&spec, cx, cy, radius);
    let border = spec
        .datasets
        .first()
        .and_then(|d| d.border.clone())
        .unwrap_or_else(|| colors::OPTIMAL.to_string());

    view! {
        <svg
            class="radar-chart"
            viewBox=dims.viewbox()
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: 100%;"
        >
            {layout.rings.into_iter().map(|d| view! {
                <path d=d fill="none" stroke=colors::GRID />
            }).collect_view()}
            {layout.spokes.into_iter().map(|(x, y)| view! {
                <line x1=cx y1=cy x2=x y2=y stroke=colors::GRID />
            }).collect_view()}
            <path d=layout.area fill=colors::RADAR_FILL stroke=border stroke-width="2" />
            {layout.points.into_iter().map(|point| {
                let tip = point.tooltip.clone();
                view! {
                    <circle
                        cx=point.x
                        cy=point.y
                        r="5"
                        fill=point.fill
                        stroke=colors::WHITE
                        on:mouseenter=move |_| hovered.set(Some(tip.clone()))
                        on:mouseleave=move |_| hovered.set(None)
                    />
                }
            }).collect_view()}
            {layout.labels.into_iter().map(|label| view! {
                <text
                    x=label.x
                    y=label.y
                    dy="0.32em"
                    text-anchor=label.anchor
                    fill=colors::TEXT_PRIMARY
                    font-size="11"
                >
                    {label.text}
                </text>
            }).collect_view()}
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dataset, fertilizer, mandi};
    use krishi_core::{LabeledSeries, MandiRow};

    fn dims() -> ChartDimensions {
        ChartDimensions::new(400.0, 300.0).with_margin(ChartMargin::uniform(0.0))
    }

    #[test]
    fn test_grouped_bars_share_band() {
        let rows = vec![
            MandiRow::new("A", "Wheat", 100.0, 200.0, 150.0),
            MandiRow::new("A", "Rice", 50.0, 100.0, 80.0),
        ];
        let spec = mandi::market_min_max(&rows, "A");
        let marks = bar_marks(&spec, &dims());
        assert_eq!(marks.len(), 4);

        // min and max bars for Wheat sit side by side
        assert!((marks[0].x + marks[0].width - marks[2].x).abs() < 1e-9);
        // the 200 bar is the tallest and reaches the nice top of 200
        assert!((marks[2].height - 300.0).abs() < 1e-9);
        assert!(marks[2].y.abs() < 1e-9);
    }

    #[test]
    fn test_stacked_bars_accumulate() {
        let spec = ChartSpec::new(CanvasId::NutrientCoverage, ChartKind::Bar, vec!["DAP".into()])
            .stacked()
            .value_max(100.0)
            .dataset(Dataset::new("N", vec![25.0]))
            .dataset(Dataset::new("P", vec![50.0]));
        let marks = bar_marks(&spec, &dims());

        assert!((marks[0].height - 75.0).abs() < 1e-9);
        assert!((marks[1].height - 150.0).abs() < 1e-9);
        // second segment sits directly on top of the first
        assert!((marks[1].y + marks[1].height - marks[0].y).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_bars_grow_along_x() {
        let spec = ChartSpec::new(CanvasId::DeficiencyBar, ChartKind::Bar, vec!["N".into(), "K".into()])
            .horizontal()
            .value_max(40.0)
            .dataset(Dataset::new("Deficiency", vec![40.0, 10.0]));
        let marks = bar_marks(&spec, &dims());
        assert_eq!(marks[0].x, 0.0);
        assert!((marks[0].width - 400.0).abs() < 1e-9);
        assert!((marks[1].width - 100.0).abs() < 1e-9);
        assert!(marks[1].y > marks[0].y);
    }

    #[test]
    fn test_doughnut_and_polar_arcs() {
        let series = LabeledSeries::new(vec!["Wheat".into(), "Rice".into()], vec![1.0, 0.0]);
        let doughnut = arc_marks(&mandi::commodity_distribution(&series), 100.0, 100.0, 80.0);
        // zero-size slices are skipped
        assert_eq!(doughnut.len(), 1);
        assert!(doughnut[0].path.contains("A44.00,44.00"));

        let polar = ChartSpec::new(CanvasId::DeficiencySeverity, ChartKind::PolarArea, vec!["N".into(), "K".into()])
            .value_max(3.0)
            .dataset(Dataset::new("", vec![3.0, 1.0]));
        let arcs = arc_marks(&polar, 100.0, 100.0, 90.0);
        assert_eq!(arcs.len(), 2);
        assert!(arcs[0].path.contains("A90.00,90.00"));
        assert!(arcs[1].path.contains("A30.00,30.00"));
    }

    #[test]
    fn test_radar_layout_scales_points() {
        let report: krishi_core::FertilizerReportData = serde_json::from_str(
            r#"{"soilTestResults": [
                {"parameter": "pH", "value": 14.0, "status": "OPTIMAL"},
                {"parameter": "OC (%)", "value": 1.5, "status": "MODERATE"},
                {"parameter": "EC (dS/m)", "value": 0.0, "status": "OPTIMAL"}
            ]}"#,
        )
        .unwrap();
        let spec = fertilizer::soil_radar(&report.soil_test_results).unwrap();
        let layout = radar_layout(&spec, 100.0, 100.0, 50.0);

        assert_eq!(layout.rings.len(), 4);
        assert_eq!(layout.spokes.len(), 3);
        // full-scale pH sits on the outer ring straight up
        assert!((layout.points[0].x - 100.0).abs() < 1e-9);
        assert!((layout.points[0].y - 50.0).abs() < 1e-9);
        // zero EC collapses onto the centre
        assert!((layout.points[2].x - 100.0).abs() < 1e-9);
        assert_eq!(layout.labels[0].anchor, "middle");
        assert_eq!(layout.labels[1].anchor, "start");
    }

    #[test]
    fn test_legend_entries() {
        let series = LabeledSeries::new(vec!["Wheat".into(), "Rice".into()], vec![2.0, 1.0]);
        let entries = legend_entries(&mandi::commodity_distribution(&series));
        assert_eq!(entries[1], ("Rice".to_string(), "#36A2EB".to_string()));

        assert!(legend_entries(&mandi::market_comparison(&series)).is_empty());
    }

    #[test]
    fn test_destroy_clears_chart() {
        let series = LabeledSeries::new(vec!["Wheat".into()], vec![2.0]);
        let mut chart = SvgChart::new(mandi::commodity_distribution(&series));
        chart.destroy();
        assert!(chart.spec.is_empty());
    }
}
