//! Filter-driven mandi dashboard state
//!
//! The filter picks one of four display modes. Each mode names the panels
//! to show and the ordered chart jobs to run against the chart registry.

use crate::Paginator;
use krishi_charts::{mandi as charts, CanvasId, ChartError, ChartInstance, ChartRegistry, ChartSpec};
use krishi_core::{DistrictPayload, MandiRow};
use tracing::{debug, warn};

// ============================================================================
// FILTER STATE
// ============================================================================

/// Selected commodity and market; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub commodity: Option<String>,
    pub market: Option<String>,
}

impl FilterState {
    pub fn new(commodity: &str, market: &str) -> Self {
        Self {
            commodity: non_empty(commodity),
            market: non_empty(market),
        }
    }

    pub fn set_commodity(&mut self, value: &str) {
        self.commodity = non_empty(value);
    }

    pub fn set_market(&mut self, value: &str) {
        self.market = non_empty(value);
    }

    pub fn commodity_value(&self) -> &str {
        self.commodity.as_deref().unwrap_or_default()
    }

    pub fn market_value(&self) -> &str {
        self.market.as_deref().unwrap_or_default()
    }

    /// Query pairs for `/district-data`; unset filters are sent empty
    pub fn query(&self) -> [(&'static str, &str); 2] {
        [
            ("commodity", self.commodity_value()),
            ("market", self.market_value()),
        ]
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ============================================================================
// VIEW SELECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// No filter
    Overview,
    /// Commodity only
    Commodity,
    /// Market only
    Market,
    /// Commodity and market; drawn like `Commodity`
    CommodityAndMarket,
}

/// Container visibility for one mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSet {
    pub distribution: bool,
    pub market_comparison: bool,
    pub price_ranges: bool,
    pub variety_price_range: bool,
}

impl PanelSet {
    pub fn is_visible(&self, canvas: CanvasId) -> bool {
        match canvas {
            CanvasId::CommodityDistribution => self.distribution,
            CanvasId::MarketComparison => self.market_comparison,
            CanvasId::PriceRanges => self.price_ranges,
            CanvasId::VarietyPriceRange => self.variety_price_range,
            _ => false,
        }
    }
}

/// One chart to (re)build for the current mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartJob {
    CommodityDistribution,
    PriceRanges,
    MarketComparison,
    VarietyPriceRange { commodity: String },
    MarketMinMax { market: String },
}

impl ChartJob {
    pub fn canvas(&self) -> CanvasId {
        match self {
            Self::CommodityDistribution => CanvasId::CommodityDistribution,
            Self::PriceRanges => CanvasId::PriceRanges,
            Self::MarketComparison | Self::MarketMinMax { .. } => CanvasId::MarketComparison,
            Self::VarietyPriceRange { .. } => CanvasId::VarietyPriceRange,
        }
    }

    pub fn build(&self, payload: &DistrictPayload) -> ChartSpec {
        match self {
            Self::CommodityDistribution => charts::commodity_distribution(&payload.commodity_distribution),
            Self::PriceRanges => charts::price_ranges(&payload.price_ranges),
            Self::MarketComparison => charts::market_comparison(&payload.market_comparison),
            Self::VarietyPriceRange { commodity } => {
                charts::variety_price_range(&payload.table_data, commodity)
            }
            Self::MarketMinMax { market } => charts::market_min_max(&payload.table_data, market),
        }
    }
}

impl ViewMode {
    pub fn select(filter: &FilterState) -> Self {
        match (&filter.commodity, &filter.market) {
            (None, None) => Self::Overview,
            (Some(_), None) => Self::Commodity,
            (None, Some(_)) => Self::Market,
            (Some(_), Some(_)) => Self::CommodityAndMarket,
        }
    }

    pub fn panels(&self) -> PanelSet {
        match self {
            Self::Overview => PanelSet {
                distribution: true,
                price_ranges: true,
                ..PanelSet::default()
            },
            Self::Commodity | Self::CommodityAndMarket => PanelSet {
                market_comparison: true,
                variety_price_range: true,
                ..PanelSet::default()
            },
            // min/max by commodity reuses the market comparison panel
            Self::Market => PanelSet {
                distribution: true,
                price_ranges: true,
                market_comparison: true,
                ..PanelSet::default()
            },
        }
    }

    pub fn chart_plan(&self, filter: &FilterState) -> Vec<ChartJob> {
        let commodity = filter.commodity_value().to_string();
        let market = filter.market_value().to_string();

        match self {
            Self::Overview => vec![ChartJob::CommodityDistribution, ChartJob::PriceRanges],
            Self::Commodity | Self::CommodityAndMarket => vec![
                ChartJob::MarketComparison,
                ChartJob::VarietyPriceRange { commodity },
            ],
            Self::Market => vec![
                ChartJob::CommodityDistribution,
                ChartJob::PriceRanges,
                ChartJob::MarketMinMax { market },
            ],
        }
    }
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// Choices offered by the filter selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub commodities: Vec<String>,
    pub markets: Vec<String>,
}

impl FilterOptions {
    /// Distinct values of the payload rows; the current selection stays listed
    pub fn from_payload(payload: &DistrictPayload, filter: &FilterState) -> Self {
        let mut commodities = payload.commodities();
        let mut markets = payload.markets();
        keep_selected(&mut commodities, filter.commodity.as_deref());
        keep_selected(&mut markets, filter.market.as_deref());
        Self { commodities, markets }
    }
}

fn keep_selected(options: &mut Vec<String>, selected: Option<&str>) {
    if let Some(selected) = selected {
        if !options.iter().any(|o| o == selected) {
            options.insert(0, selected.to_string());
        }
    }
}

// ============================================================================
// VIEW CONTROLLER
// ============================================================================

/// Outcome of applying one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub drawn: Vec<CanvasId>,
    pub skipped: Vec<CanvasId>,
}

#[derive(Debug, Clone)]
pub struct MandiView {
    pub filter: FilterState,
    pub mode: ViewMode,
    pub options: FilterOptions,
}

impl Default for MandiView {
    fn default() -> Self {
        Self {
            filter: FilterState::default(),
            mode: ViewMode::Overview,
            options: FilterOptions::default(),
        }
    }
}

impl MandiView {
    pub fn panels(&self) -> PanelSet {
        self.mode.panels()
    }

    /// Redraw charts for a freshly fetched payload and reset `table` to its
    /// first page of the new rows.
    ///
    /// Charts outside the plan are destroyed; jobs whose canvas is not
    /// attached are skipped and reported.
    pub fn apply<H, F>(
        &mut self,
        payload: DistrictPayload,
        registry: &mut ChartRegistry<H>,
        table: &mut Paginator<MandiRow>,
        mut make: F,
    ) -> ApplyReport
    where
        H: ChartInstance,
        F: FnMut(ChartSpec) -> H,
    {
        self.mode = ViewMode::select(&self.filter);
        let plan = self.mode.chart_plan(&self.filter);
        debug!(mode = ?self.mode, jobs = plan.len(), "applying mandi payload");

        for id in CanvasId::MANDI {
            if !plan.iter().any(|job| job.canvas() == id) {
                registry.destroy(id);
            }
        }

        let mut report = ApplyReport::default();
        for job in &plan {
            let spec = job.build(&payload);
            match registry.replace(job.canvas(), || make(spec)) {
                Ok(_) => report.drawn.push(job.canvas()),
                Err(ChartError::CanvasMissing(id)) => {
                    warn!(canvas = %id, "chart canvas not found, skipping");
                    report.skipped.push(id);
                }
            }
        }

        self.options = FilterOptions::from_payload(&payload, &self.filter);
        table.set_data(payload.table_data);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::LabeledSeries;

    struct Handle {
        spec: ChartSpec,
    }

    impl ChartInstance for Handle {
        fn destroy(&mut self) {}
    }

    fn payload() -> DistrictPayload {
        DistrictPayload {
            table_data: (0..23)
                .map(|i| {
                    let commodity = if i % 2 == 0 { "Wheat" } else { "Onion" };
                    MandiRow::new("Azadpur", commodity, 10.0 + i as f64, 50.0, 30.0)
                })
                .collect(),
            commodity_distribution: LabeledSeries::new(vec!["Wheat".into()], vec![12.0]),
            market_comparison: LabeledSeries::new(vec!["Azadpur".into()], vec![30.0]),
            ..DistrictPayload::default()
        }
    }

    fn attached() -> ChartRegistry<Handle> {
        let mut registry = ChartRegistry::new();
        for id in CanvasId::MANDI {
            registry.attach(id);
        }
        registry
    }

    #[test]
    fn test_empty_strings_mean_all() {
        let filter = FilterState::new("", "  ");
        assert_eq!(filter, FilterState::default());
        assert_eq!(filter.query(), [("commodity", ""), ("market", "")]);

        let filter = FilterState::new("Wheat", "");
        assert_eq!(filter.query(), [("commodity", "Wheat"), ("market", "")]);
    }

    #[test]
    fn test_every_filter_selects_one_mode() {
        let cases = [
            (("", ""), ViewMode::Overview),
            (("Wheat", ""), ViewMode::Commodity),
            (("", "Azadpur"), ViewMode::Market),
            (("Wheat", "Azadpur"), ViewMode::CommodityAndMarket),
        ];
        for ((c, m), expected) in cases {
            let filter = FilterState::new(c, m);
            let mode = ViewMode::select(&filter);
            assert_eq!(mode, expected);

            // every planned chart lands in a visible panel
            for job in mode.chart_plan(&filter) {
                assert!(mode.panels().is_visible(job.canvas()));
            }
        }
    }

    #[test]
    fn test_commodity_only_panels() {
        let panels = ViewMode::select(&FilterState::new("Wheat", "")).panels();
        assert!(panels.market_comparison && panels.variety_price_range);
        assert!(!panels.distribution && !panels.price_ranges);
        assert_eq!(
            ViewMode::CommodityAndMarket.panels(),
            ViewMode::Commodity.panels()
        );
    }

    #[test]
    fn test_market_mode_draws_min_max_on_comparison_canvas() {
        let filter = FilterState::new("", "Azadpur");
        let plan = ViewMode::select(&filter).chart_plan(&filter);
        assert_eq!(
            plan.last(),
            Some(&ChartJob::MarketMinMax { market: "Azadpur".into() })
        );
        assert_eq!(plan[2].canvas(), CanvasId::MarketComparison);
    }

    #[test]
    fn test_commodity_and_market_draws_variety_for_commodity() {
        let filter = FilterState::new("Wheat", "Azadpur");
        let mode = ViewMode::select(&filter);
        assert_eq!(mode, ViewMode::CommodityAndMarket);

        let panels = mode.panels();
        assert!(panels.market_comparison && panels.variety_price_range);
        assert!(!panels.distribution && !panels.price_ranges);

        let plan = mode.chart_plan(&filter);
        assert_eq!(
            plan,
            vec![
                ChartJob::MarketComparison,
                ChartJob::VarietyPriceRange { commodity: "Wheat".into() },
            ]
        );
        assert_eq!(plan[1].canvas(), CanvasId::VarietyPriceRange);

        let mut view = MandiView { filter, ..MandiView::default() };
        let mut table = Paginator::default();
        let mut registry = attached();
        let report = view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });

        assert_eq!(report.drawn, vec![CanvasId::MarketComparison, CanvasId::VarietyPriceRange]);
        assert_eq!(registry.live_count(), 2);
        assert!(registry.get(CanvasId::CommodityDistribution).is_none());
        let title = registry
            .get(CanvasId::MarketComparison)
            .and_then(|h| h.spec.title.clone());
        assert_eq!(title.as_deref(), Some("Market Price Comparison"));
        assert_eq!(table.len(), 23);
    }

    #[test]
    fn test_apply_draws_plan_and_resets_table() {
        let mut view = MandiView::default();
        let mut table = Paginator::default();
        let mut registry = attached();

        table.set_data(payload().table_data);
        table.go_to(3);

        view.filter = FilterState::new("Wheat", "");
        let report = view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });

        assert_eq!(report.drawn, vec![CanvasId::MarketComparison, CanvasId::VarietyPriceRange]);
        assert!(report.skipped.is_empty());
        assert_eq!(registry.live_count(), 2);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.len(), 23);
        let variety = registry.get(CanvasId::VarietyPriceRange).map(|h| h.spec.labels.clone());
        assert_eq!(variety, Some(vec!["Unknown".to_string()]));
    }

    #[test]
    fn test_switching_modes_replaces_shared_canvas() {
        let mut view = MandiView::default();
        let mut table = Paginator::default();
        let mut registry = attached();

        view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });
        assert_eq!(registry.live_count(), 2);
        assert!(registry.get(CanvasId::MarketComparison).is_none());

        view.filter = FilterState::new("", "Azadpur");
        view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });
        assert_eq!(registry.live_count(), 3);
        let title = registry
            .get(CanvasId::MarketComparison)
            .and_then(|h| h.spec.title.clone());
        assert_eq!(title.as_deref(), Some("Min/Max Price by Commodity in Azadpur"));

        view.filter = FilterState::new("Onion", "Azadpur");
        view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });
        assert_eq!(registry.live_count(), 2);
        let title = registry
            .get(CanvasId::MarketComparison)
            .and_then(|h| h.spec.title.clone());
        assert_eq!(title.as_deref(), Some("Market Price Comparison"));
    }

    #[test]
    fn test_missing_canvas_is_skipped() {
        let mut view = MandiView::default();
        let mut table = Paginator::default();
        let mut registry = ChartRegistry::new();
        registry.attach(CanvasId::PriceRanges);

        let report = view.apply(payload(), &mut registry, &mut table, |spec| Handle { spec });
        assert_eq!(report.drawn, vec![CanvasId::PriceRanges]);
        assert_eq!(report.skipped, vec![CanvasId::CommodityDistribution]);
        assert_eq!(table.len(), 23);
    }

    #[test]
    fn test_filter_options_keep_selection() {
        let filter = FilterState::new("Rice", "");
        let options = FilterOptions::from_payload(&payload(), &filter);
        assert_eq!(options.commodities, vec!["Rice", "Wheat", "Onion"]);
        assert_eq!(options.markets, vec!["Azadpur"]);
    }
}
