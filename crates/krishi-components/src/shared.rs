//! Banners and overlays shared by every page

use krishi_core::Text;
use krishi_state::use_app_state;
use leptos::prelude::*;

/// Page-level error from `AppState::error`
#[component]
pub fn ErrorBanner(
    /// Show a close button that clears the error
    #[prop(optional)]
    dismissible: bool,
) -> impl IntoView {
    let state = use_app_state();
    let error = state.error;
    let language = state.language;

    move || {
        error.get().map(|message| {
            let state = state.clone();
            view! {
                <div class="error-banner" role="alert">
                    <strong class="error-title">{move || language.get().t(Text::ErrorTitle)}</strong>
                    " "
                    <span class="error-msg">{message}</span>
                    {dismissible.then(move || view! {
                        <button class="error-close" on:click=move |_| state.clear_error()>"×"</button>
                    })}
                </div>
            }
        })
    }
}

/// Full-screen spinner while `AppState::loading` is set
#[component]
pub fn LoadingOverlay() -> impl IntoView {
    let state = use_app_state();
    let loading = state.loading;
    let language = state.language;

    view! {
        <Show when=move || loading.get()>
            <div class="loading-overlay">
                <div class="loading-box">
                    <div class="spinner"></div>
                    <p>{move || language.get().t(Text::LoadingData)}</p>
                </div>
            </div>
        </Show>
    }
}
