//! Krishi Mitra web client entry point

use krishi_api::{ApiClient, ApiConfig};
use krishi_components::{ChatPage, FertilizerReport, MandiDashboard, SoilReportPage};
use krishi_core::Language;
use krishi_state::provide_app_state;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{A, Redirect, Route, Router, Routes};
use leptos_router::path;
use tracing_wasm::WASMLayerConfigBuilder;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::DEBUG)
            .build(),
    );

    tracing::info!("starting Krishi Mitra web client");
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    provide_meta_context();
    provide_app_state(Language::default());
    provide_context(ApiClient::with_config(ApiConfig::new()));

    view! {
        <Title text="Krishi Mitra" />
        <Router>
            <nav class="top-nav">
                <A href="/advance_mandi">"Mandi Prices"</A>
                <A href="/chat">"Assistant"</A>
                <A href="/soil_report">"Soil Report"</A>
            </nav>
            <main>
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/advance_mandi" /> } />
                    <Route path=path!("/advance_mandi") view=MandiDashboard />
                    <Route path=path!("/chat") view=ChatPage />
                    <Route path=path!("/soil_report") view=SoilReportPage />
                    <Route path=path!("/fertilizer_report/:id") view=FertilizerReport />
                </Routes>
            </main>
        </Router>
    }
}
