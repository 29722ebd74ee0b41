//! Mandi (market) price types returned by the advance-mandi endpoints

use crate::{PriceFormatter, RupeeFormatter};
use serde::{Deserialize, Serialize};

/// Label used for rows without a variety
pub const UNKNOWN_VARIETY: &str = "Unknown";

/// One price report for a commodity at a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiRow {
    pub market: String,
    pub commodity: String,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<String>,
}

impl MandiRow {
    pub fn new(
        market: impl Into<String>,
        commodity: impl Into<String>,
        min_price: f64,
        max_price: f64,
        modal_price: f64,
    ) -> Self {
        Self {
            market: market.into(),
            commodity: commodity.into(),
            variety: None,
            grade: None,
            min_price,
            max_price,
            modal_price,
            state: None,
            district: None,
            arrival_date: None,
        }
    }

    pub fn with_variety(mut self, variety: impl Into<String>) -> Self {
        self.variety = Some(variety.into());
        self
    }

    /// Variety used as a chart category
    pub fn variety_key(&self) -> &str {
        non_empty(self.variety.as_deref()).unwrap_or(UNKNOWN_VARIETY)
    }

    /// Variety for table display
    pub fn variety_label(&self) -> &str {
        non_empty(self.variety.as_deref()).unwrap_or("-")
    }

    /// Grade for table display
    pub fn grade_label(&self) -> &str {
        non_empty(self.grade.as_deref()).unwrap_or("-")
    }

    /// Formatted (min, max, modal) prices
    pub fn price_cells<F: PriceFormatter>(&self, formatter: &F) -> [String; 3] {
        [
            formatter.format(self.min_price),
            formatter.format(self.max_price),
            formatter.format(self.modal_price),
        ]
    }

    pub fn rupee_cells(&self) -> [String; 3] {
        self.price_cells(&RupeeFormatter)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// District near the user, as returned by `/nearest-districts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestDistrict {
    pub district_name: String,
    pub state_name: String,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl NearestDistrict {
    pub fn distance_label(&self) -> String {
        match self.distance {
            Some(d) if d != 0.0 => format!("{:.2} km", d),
            _ => "N/A km".to_string(),
        }
    }
}

/// Parallel label/value arrays (chart-ready aggregate)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<f64>,
}

impl LabeledSeries {
    pub fn new(labels: Vec<String>, data: Vec<f64>) -> Self {
        Self { labels, data }
    }

    /// Label/value pairs, truncated to the shorter array
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.data.is_empty()
    }
}

/// Min / max / average price of one commodity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<PriceRange>,
}

impl PriceRangeSeries {
    pub fn points(&self) -> impl Iterator<Item = (&str, PriceRange)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }
}

/// Combined payload of `/district-data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictPayload {
    #[serde(default)]
    pub table_data: Vec<MandiRow>,
    #[serde(default)]
    pub commodity_distribution: LabeledSeries,
    #[serde(default)]
    pub market_comparison: LabeledSeries,
    #[serde(default)]
    pub price_ranges: PriceRangeSeries,
}

impl DistrictPayload {
    /// Distinct commodities in first-seen order
    pub fn commodities(&self) -> Vec<String> {
        distinct(self.table_data.iter().map(|r| r.commodity.as_str()))
    }

    /// Distinct markets in first-seen order
    pub fn markets(&self) -> Vec<String> {
        distinct(self.table_data.iter().map(|r| r.market.as_str()))
    }
}

/// Min of `min_price` / max of `max_price` for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRange {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

/// Group rows by `key` (first-seen order) and reduce each group to its
/// lowest `min_price` and highest `max_price`.
pub fn min_max_by<'a, I, K>(rows: I, key: K) -> Vec<CategoryRange>
where
    I: IntoIterator<Item = &'a MandiRow>,
    K: Fn(&'a MandiRow) -> &'a str,
{
    let mut ranges: Vec<CategoryRange> = Vec::new();

    for row in rows {
        let label = key(row);
        match ranges.iter_mut().find(|r| r.label == label) {
            Some(range) => {
                range.min = range.min.min(row.min_price);
                range.max = range.max.max(row.max_price);
            }
            None => ranges.push(CategoryRange {
                label: label.to_string(),
                min: row.min_price,
                max: row.max_price,
            }),
        }
    }

    ranges
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_reduces_category() {
        let rows = vec![
            MandiRow::new("Indore", "Wheat", 10.0, 50.0, 30.0).with_variety("Lokwan"),
            MandiRow::new("Dewas", "Wheat", 5.0, 30.0, 20.0).with_variety("Lokwan"),
        ];
        let ranges = min_max_by(&rows, |r| r.variety_key());
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].min, 5.0);
        assert_eq!(ranges[0].max, 50.0);
    }

    #[test]
    fn test_min_max_keeps_first_seen_order() {
        let rows = vec![
            MandiRow::new("Indore", "Soybean", 4000.0, 4500.0, 4200.0),
            MandiRow::new("Indore", "Wheat", 2100.0, 2300.0, 2200.0),
            MandiRow::new("Indore", "Soybean", 3900.0, 4400.0, 4100.0),
        ];
        let ranges = min_max_by(&rows, |r| r.commodity.as_str());
        let labels: Vec<_> = ranges.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Soybean", "Wheat"]);
        assert_eq!(ranges[0].min, 3900.0);
        assert_eq!(ranges[0].max, 4500.0);
    }

    #[test]
    fn test_variety_fallbacks() {
        let row = MandiRow::new("Indore", "Wheat", 1.0, 2.0, 1.5);
        assert_eq!(row.variety_key(), UNKNOWN_VARIETY);
        assert_eq!(row.variety_label(), "-");
        let row = row.with_variety("");
        assert_eq!(row.variety_key(), UNKNOWN_VARIETY);
    }

    #[test]
    fn test_payload_decoding_and_options() {
        let json = r#"{
            "table_data": [
                {"market": "Indore", "commodity": "Wheat", "variety": "Lokwan", "grade": "FAQ",
                 "min_price": 2100, "max_price": 2400, "modal_price": 2250, "arrival_date": "2025-01-10"},
                {"market": "Dewas", "commodity": "Gram", "min_price": 5000, "max_price": 5600, "modal_price": 5300},
                {"market": "Indore", "commodity": "Gram", "min_price": 5100, "max_price": 5500, "modal_price": 5250}
            ],
            "commodity_distribution": {"labels": ["Wheat", "Gram"], "data": [1, 2]},
            "price_ranges": {"labels": ["Wheat"], "data": [{"min": 2100, "max": 2400, "avg": 2250}]}
        }"#;
        let payload: DistrictPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.table_data.len(), 3);
        assert!(payload.market_comparison.is_empty());
        assert_eq!(payload.commodities(), vec!["Wheat", "Gram"]);
        assert_eq!(payload.markets(), vec!["Indore", "Dewas"]);
        assert_eq!(payload.price_ranges.points().next().unwrap().1.avg, 2250.0);
    }

    #[test]
    fn test_distance_label() {
        let district = NearestDistrict {
            district_name: "Indore".into(),
            state_name: "Madhya Pradesh".into(),
            distance: Some(12.345),
        };
        assert_eq!(district.distance_label(), "12.35 km");
    }
}
