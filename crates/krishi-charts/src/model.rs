//! Renderer-neutral chart model
//!
//! A `ChartSpec` is a plain description of one chart: kind, category labels,
//! datasets with colours, axis settings and per-category tooltip lines.
//! Builders produce specs; renderers draw them.

/// Every chart slot the client renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanvasId {
    CommodityDistribution,
    MarketComparison,
    PriceRanges,
    VarietyPriceRange,
    SoilRadar,
    NpkPie,
    MicronutrientsPie,
    BasicProperties,
    DeficiencyBar,
    DeficiencySeverity,
    FertilizerDose,
    NutrientCoverage,
}

impl CanvasId {
    pub const MANDI: [CanvasId; 4] = [
        Self::CommodityDistribution,
        Self::MarketComparison,
        Self::PriceRanges,
        Self::VarietyPriceRange,
    ];

    pub const FERTILIZER: [CanvasId; 8] = [
        Self::SoilRadar,
        Self::NpkPie,
        Self::MicronutrientsPie,
        Self::BasicProperties,
        Self::DeficiencyBar,
        Self::DeficiencySeverity,
        Self::FertilizerDose,
        Self::NutrientCoverage,
    ];

    /// DOM id of the chart element
    pub fn dom_id(&self) -> &'static str {
        match self {
            Self::CommodityDistribution => "commodity-distribution-chart",
            Self::MarketComparison => "market-comparison-chart",
            Self::PriceRanges => "price-ranges-chart",
            Self::VarietyPriceRange => "variety-price-range-chart",
            Self::SoilRadar => "soilRadarChart",
            Self::NpkPie => "npkPieChart",
            Self::MicronutrientsPie => "micronutrientsPieChart",
            Self::BasicProperties => "basicPropertiesChart",
            Self::DeficiencyBar => "deficiencyBarChart",
            Self::DeficiencySeverity => "deficiencySeverityChart",
            Self::FertilizerDose => "fertilizerDoseChart",
            Self::NutrientCoverage => "nutrientCoverageChart",
        }
    }
}

impl std::fmt::Display for CanvasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dom_id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Doughnut,
    Pie,
    Radar,
    PolarArea,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BarLayout {
    #[default]
    Grouped,
    Stacked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegendPosition {
    #[default]
    Hidden,
    Top,
    Right,
    Bottom,
}

/// One series of values, aligned with the chart labels
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    /// Fill colours; a single entry applies to every point
    pub fill: Vec<String>,
    pub border: Option<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            fill: Vec::new(),
            border: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.fill = vec![color.into()];
        self
    }

    pub fn point_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fill = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn border(mut self, color: impl Into<String>) -> Self {
        self.border = Some(color.into());
        self
    }

    /// Fill colour for the point at `index`, cycling short palettes
    pub fn fill_at(&self, index: usize) -> &str {
        if self.fill.is_empty() {
            return crate::colors::DEFAULT;
        }
        &self.fill[index % self.fill.len()]
    }
}

/// Value axis settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueAxis {
    pub title: Option<String>,
    /// Fixed maximum; otherwise the axis is fitted to the data
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub canvas: CanvasId,
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub orientation: Orientation,
    pub layout: BarLayout,
    pub value_axis: ValueAxis,
    pub legend: LegendPosition,
    /// Extra tooltip lines per label index
    pub notes: Vec<Vec<String>>,
    /// Whether tooltips lead with the `dataset: value` line
    pub value_line: bool,
}

impl ChartSpec {
    pub fn new(canvas: CanvasId, kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            canvas,
            kind,
            title: None,
            labels,
            datasets: Vec::new(),
            orientation: Orientation::default(),
            layout: BarLayout::default(),
            value_axis: ValueAxis::default(),
            legend: LegendPosition::default(),
            notes: Vec::new(),
            value_line: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn stacked(mut self) -> Self {
        self.layout = BarLayout::Stacked;
        self
    }

    pub fn value_title(mut self, title: impl Into<String>) -> Self {
        self.value_axis.title = Some(title.into());
        self
    }

    pub fn value_max(mut self, max: f64) -> Self {
        self.value_axis.max = Some(max);
        self
    }

    pub fn legend(mut self, position: LegendPosition) -> Self {
        self.legend = position;
        self
    }

    pub fn notes(mut self, notes: Vec<Vec<String>>) -> Self {
        self.notes = notes;
        self
    }

    /// Tooltips show only the label and its notes
    pub fn notes_only(mut self) -> Self {
        self.value_line = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.data.is_empty())
    }

    /// Largest value the value axis must show
    pub fn value_extent(&self) -> f64 {
        if let Some(max) = self.value_axis.max {
            return max;
        }

        let extent = match self.layout {
            BarLayout::Stacked => (0..self.labels.len())
                .map(|i| {
                    self.datasets
                        .iter()
                        .filter_map(|d| d.data.get(i))
                        .filter(|v| **v > 0.0)
                        .sum::<f64>()
                })
                .fold(0.0, f64::max),
            BarLayout::Grouped => self
                .datasets
                .iter()
                .flat_map(|d| d.data.iter().copied())
                .fold(0.0, f64::max),
        };
        extent.max(0.0)
    }

    /// Tooltip text for the point `index` of dataset `series`
    pub fn tooltip(&self, series: usize, index: usize) -> String {
        let label = self.labels.get(index).map(String::as_str).unwrap_or_default();
        let mut lines = Vec::new();

        if !self.value_line {
            lines.push(label.to_string());
        } else if let Some(dataset) = self.datasets.get(series) {
            let value = dataset.data.get(index).copied().unwrap_or_default();
            if dataset.label.is_empty() {
                lines.push(format!("{}: {}", label, value));
            } else {
                lines.push(label.to_string());
                lines.push(format!("{}: {}", dataset.label, value));
            }
        }

        if let Some(notes) = self.notes.get(index) {
            lines.extend(notes.iter().cloned());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ChartSpec {
        ChartSpec::new(CanvasId::NutrientCoverage, ChartKind::Bar, vec!["DAP".into(), "Urea".into()])
            .dataset(Dataset::new("N", vec![18.0, 46.0]))
            .dataset(Dataset::new("P", vec![46.0, 0.0]))
    }

    #[test]
    fn test_value_extent_grouped_and_stacked() {
        assert_eq!(spec().value_extent(), 46.0);
        assert_eq!(spec().stacked().value_extent(), 64.0);
        assert_eq!(spec().value_max(3.0).value_extent(), 3.0);
    }

    #[test]
    fn test_tooltip_lines() {
        let chart = spec().notes(vec![vec!["Type: Fertilizer".into()]]);
        assert_eq!(chart.tooltip(1, 0), "DAP\nP: 46\nType: Fertilizer");
        assert_eq!(chart.tooltip(0, 1), "Urea\nN: 46");
        assert_eq!(chart.notes_only().tooltip(0, 0), "DAP\nType: Fertilizer");
    }

    #[test]
    fn test_fill_cycles_palette() {
        let ds = Dataset::new("", vec![1.0, 2.0, 3.0]).point_colors(["#a", "#b"]);
        assert_eq!(ds.fill_at(2), "#a");
        assert_eq!(Dataset::new("", vec![]).fill_at(0), crate::colors::DEFAULT);
    }

    #[test]
    fn test_canvas_dom_ids() {
        assert_eq!(CanvasId::MarketComparison.dom_id(), "market-comparison-chart");
        assert_eq!(CanvasId::FERTILIZER.len(), 8);
    }
}
