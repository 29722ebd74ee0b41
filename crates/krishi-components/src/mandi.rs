//! Mandi price dashboard

use crate::{ErrorBanner, LoadingOverlay, MandiTable, use_api};
use krishi_charts::{CanvasId, ChartCanvas, SvgChart};
use krishi_core::{MandiRow, NearestDistrict, Text};
use krishi_state::{MandiView, Paginator, use_app_state};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn MandiDashboard() -> impl IntoView {
    let state = use_app_state();
    let api = StoredValue::new(use_api());
    let view = RwSignal::new(MandiView::default());
    // paging leaves the filter selects alone
    let table = RwSignal::new(Paginator::<MandiRow>::default());
    let districts = RwSignal::new(Vec::<NearestDistrict>::new());
    let language = state.language;

    let load_data = {
        let state = state.clone();
        move || {
            let filter = view.with_untracked(|v| v.filter.clone());
            let client = api.get_value();
            let state = state.clone();
            state.set_loading(true);

            spawn_local(async move {
                match client.district_data(filter.query()).await {
                    Ok(payload) => {
                        let mut report = None;
                        state.charts.update(|registry| {
                            view.update(|v| {
                                table.update(|t| {
                                    report = Some(v.apply(payload, registry, t, SvgChart::new));
                                });
                            });
                        });
                        state.clear_error();
                        if let Some(report) = report {
                            tracing::debug!(
                                drawn = report.drawn.len(),
                                skipped = report.skipped.len(),
                                "mandi charts updated"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!("loading mandi data failed: {}", e);
                        state.set_error(e.to_string());
                    }
                }
                state.set_loading(false);
            });
        }
    };

    // Nearest districts first; the price data only loads once they are known
    {
        let state = state.clone();
        let load_data = load_data.clone();
        let client = api.get_value();
        state.set_loading(true);
        spawn_local(async move {
            match client.nearest_districts().await {
                Ok(list) => {
                    tracing::info!(count = list.len(), "nearest districts loaded");
                    districts.set(list);
                    state.set_loading(false);
                    load_data();
                }
                Err(e) => {
                    tracing::error!("loading nearest districts failed: {}", e);
                    state.set_error(e.to_string());
                    state.set_loading(false);
                }
            }
        });
    }

    let panels = Memo::new(move |_| view.with(|v| v.panels()));
    let display = move |id: CanvasId| move || if panels.get().is_visible(id) { "" } else { "none" };
    let charts = state.charts;

    let commodity_options = move || {
        view.with(|v| {
            let selected = v.filter.commodity_value().to_string();
            v.options
                .commodities
                .iter()
                .map(|c| view! { <option value=c.clone() selected={*c == selected}>{c.clone()}</option> })
                .collect_view()
        })
    };
    let market_options = move || {
        view.with(|v| {
            let selected = v.filter.market_value().to_string();
            v.options
                .markets
                .iter()
                .map(|m| view! { <option value=m.clone() selected={*m == selected}>{m.clone()}</option> })
                .collect_view()
        })
    };

    view! {
        <div class="container mandi-dashboard">
            <ErrorBanner dismissible=true />
            <LoadingOverlay />

            <section class="nearest-districts" id="nearest-districts">
                <For
                    each=move || districts.get()
                    key=|d| format!("{}|{}", d.district_name, d.state_name)
                    children=|district| view! { <DistrictCard district=district /> }
                />
            </section>

            <section class="filters">
                <select
                    id="commodity-filter"
                    on:change=move |ev| view.update(|v| v.filter.set_commodity(&event_target_value(&ev)))
                >
                    <option value="">{move || language.get().t(Text::AllCommodities)}</option>
                    {commodity_options}
                </select>
                <select
                    id="market-filter"
                    on:change=move |ev| view.update(|v| v.filter.set_market(&event_target_value(&ev)))
                >
                    <option value="">{move || language.get().t(Text::AllMarkets)}</option>
                    {market_options}
                </select>
                <button id="apply-filters" on:click=move |_| load_data()>
                    {move || language.get().t(Text::ApplyFilters)}
                </button>
            </section>

            <section class="mandi-charts">
                <div class="panel" style:display=display(CanvasId::CommodityDistribution)>
                    <ChartCanvas id=CanvasId::CommodityDistribution registry=charts />
                </div>
                <div class="panel" style:display=display(CanvasId::MarketComparison)>
                    <ChartCanvas id=CanvasId::MarketComparison registry=charts />
                </div>
                <div class="panel" style:display=display(CanvasId::PriceRanges)>
                    <ChartCanvas id=CanvasId::PriceRanges registry=charts />
                </div>
                <div class="panel" style:display=display(CanvasId::VarietyPriceRange)>
                    <ChartCanvas id=CanvasId::VarietyPriceRange registry=charts />
                </div>
            </section>

            <MandiTable table=table />
        </div>
    }
}

#[component]
fn DistrictCard(district: NearestDistrict) -> impl IntoView {
    let distance = district.distance_label();

    view! {
        <div class="district-card">
            <h3>{district.district_name}</h3>
            <p class="muted">{district.state_name}</p>
            <p class="distance">{distance}</p>
        </div>
    }
}
