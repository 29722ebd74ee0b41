//! Mandi dashboard chart builders

use crate::{colors, CanvasId, ChartKind, ChartSpec, Dataset, LegendPosition};
use krishi_core::{min_max_by, CategoryRange, LabeledSeries, MandiRow, PriceRangeSeries};

pub const PRICE_AXIS_TITLE: &str = "Price (₹/Quintal)";

/// Doughnut of row counts per commodity
pub fn commodity_distribution(series: &LabeledSeries) -> ChartSpec {
    let (labels, data) = unzip(series);

    ChartSpec::new(CanvasId::CommodityDistribution, ChartKind::Doughnut, labels)
        .dataset(Dataset::new("", data).point_colors(colors::SERIES))
        .legend(LegendPosition::Right)
}

/// Average price per market for the selected commodity
pub fn market_comparison(series: &LabeledSeries) -> ChartSpec {
    let (labels, data) = unzip(series);

    ChartSpec::new(CanvasId::MarketComparison, ChartKind::Bar, labels)
        .title("Market Price Comparison")
        .value_title(PRICE_AXIS_TITLE)
        .dataset(
            Dataset::new("Average Price", data)
                .color(colors::AVERAGE_BAR)
                .border(colors::AVERAGE_BORDER),
        )
}

/// Average price bars with min/max in the tooltip
pub fn price_ranges(series: &PriceRangeSeries) -> ChartSpec {
    let mut labels = Vec::new();
    let mut averages = Vec::new();
    let mut notes = Vec::new();

    for (label, range) in series.points() {
        labels.push(label.to_string());
        averages.push(range.avg);
        notes.push(vec![
            format!("Average: ₹{}", range.avg),
            format!("Min: ₹{}", range.min),
            format!("Max: ₹{}", range.max),
        ]);
    }

    ChartSpec::new(CanvasId::PriceRanges, ChartKind::Bar, labels)
        .title("Price Ranges by Commodity")
        .value_title(PRICE_AXIS_TITLE)
        .dataset(
            Dataset::new("Price Range", averages)
                .color(colors::RANGE_FILL)
                .border(colors::RANGE_BORDER),
        )
        .legend(LegendPosition::Top)
        .notes(notes)
        .notes_only()
}

/// Min/max price per variety of `commodity`
pub fn variety_price_range(rows: &[MandiRow], commodity: &str) -> ChartSpec {
    let ranges = min_max_by(
        rows.iter().filter(|r| r.commodity == commodity),
        MandiRow::variety_key,
    );

    min_max_chart(
        CanvasId::VarietyPriceRange,
        format!("Price Range by Variety for {}", commodity),
        ranges,
    )
}

/// Min/max price per commodity traded at `market`.
///
/// Drawn on the market comparison canvas.
pub fn market_min_max(rows: &[MandiRow], market: &str) -> ChartSpec {
    let ranges = min_max_by(
        rows.iter().filter(|r| r.market == market),
        |r| r.commodity.as_str(),
    );

    min_max_chart(
        CanvasId::MarketComparison,
        format!("Min/Max Price by Commodity in {}", market),
        ranges,
    )
}

fn min_max_chart(canvas: CanvasId, title: String, ranges: Vec<CategoryRange>) -> ChartSpec {
    let mut labels = Vec::with_capacity(ranges.len());
    let mut mins = Vec::with_capacity(ranges.len());
    let mut maxs = Vec::with_capacity(ranges.len());

    for range in ranges {
        labels.push(range.label);
        mins.push(range.min);
        maxs.push(range.max);
    }

    ChartSpec::new(canvas, ChartKind::Bar, labels)
        .title(title)
        .value_title(PRICE_AXIS_TITLE)
        .dataset(Dataset::new("Min Price", mins).color(colors::MIN_PRICE))
        .dataset(Dataset::new("Max Price", maxs).color(colors::MAX_PRICE))
        .legend(LegendPosition::Top)
}

fn unzip(series: &LabeledSeries) -> (Vec<String>, Vec<f64>) {
    series
        .points()
        .map(|(label, value)| (label.to_string(), value))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::PriceRange;

    fn rows() -> Vec<MandiRow> {
        vec![
            MandiRow::new("Azadpur", "Wheat", 10.0, 50.0, 30.0).with_variety("Lokwan"),
            MandiRow::new("Azadpur", "Wheat", 5.0, 30.0, 20.0).with_variety("Lokwan"),
            MandiRow::new("Narela", "Wheat", 12.0, 40.0, 25.0),
            MandiRow::new("Azadpur", "Onion", 8.0, 22.0, 15.0),
        ]
    }

    #[test]
    fn test_variety_range_reduces_min_and_max() {
        let chart = variety_price_range(&rows(), "Wheat");
        assert_eq!(chart.canvas, CanvasId::VarietyPriceRange);
        assert_eq!(chart.labels, vec!["Lokwan", "Unknown"]);
        assert_eq!(chart.datasets[0].data, vec![5.0, 12.0]);
        assert_eq!(chart.datasets[1].data, vec![50.0, 40.0]);
        assert_eq!(chart.title.as_deref(), Some("Price Range by Variety for Wheat"));
    }

    #[test]
    fn test_market_min_max_shares_comparison_canvas() {
        let chart = market_min_max(&rows(), "Azadpur");
        assert_eq!(chart.canvas, CanvasId::MarketComparison);
        assert_eq!(chart.labels, vec!["Wheat", "Onion"]);
        assert_eq!(chart.datasets[0].data, vec![5.0, 8.0]);
        assert_eq!(chart.datasets[1].data, vec![50.0, 22.0]);
        assert_eq!(market_comparison(&LabeledSeries::default()).canvas, chart.canvas);
    }

    #[test]
    fn test_distribution_palette() {
        let series = LabeledSeries::new(vec!["Wheat".into(), "Onion".into()], vec![3.0, 1.0]);
        let chart = commodity_distribution(&series);
        assert_eq!(chart.kind, ChartKind::Doughnut);
        assert_eq!(chart.datasets[0].fill_at(1), "#36A2EB");
        assert_eq!(chart.datasets[0].fill_at(15), "#FF6384");
    }

    #[test]
    fn test_price_range_tooltip() {
        let series = PriceRangeSeries {
            labels: vec!["Wheat".into()],
            data: vec![PriceRange { min: 2000.0, max: 2400.0, avg: 2215.5 }],
        };
        let chart = price_ranges(&series);
        assert_eq!(chart.datasets[0].data, vec![2215.5]);
        assert_eq!(
            chart.tooltip(0, 0),
            "Wheat\nAverage: ₹2215.5\nMin: ₹2000\nMax: ₹2400"
        );
    }
}
