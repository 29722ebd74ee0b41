//! # krishi-components
//!
//! Leptos pages for the Krishi Mitra web client: the mandi dashboard, the
//! chat assistant, the soil-report analyser and the fertilizer report charts.

pub mod chat;
pub mod fertilizer;
pub mod mandi;
pub mod media;
pub mod shared;
pub mod soil;
pub mod table;

pub use chat::*;
pub use fertilizer::*;
pub use mandi::*;
pub use shared::*;
pub use soil::*;
pub use table::*;

use krishi_core::Language;
use krishi_state::use_app_state;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

/// Adopt the `language` query parameter as the active language
pub fn use_query_language() -> Language {
    let language = Language::from_query(use_query_map().get_untracked().get("language").as_deref());
    use_app_state().language.set(language);
    language
}

/// Browser `alert()`; a blocked dialog is only logged
pub(crate) fn alert(message: &str) {
    if let Err(e) = window().alert_with_message(message) {
        tracing::warn!("alert failed: {:?}", e);
    }
}

/// Browser `confirm()`; a blocked dialog counts as "no"
pub(crate) fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

/// Full page load, used when switching chats
pub(crate) fn navigate_to(href: &str) {
    if let Err(e) = window().location().set_href(href) {
        tracing::error!(href, "navigation failed: {:?}", e);
    }
}

/// Backend client from context, falling back to same-origin defaults
pub fn use_api() -> krishi_api::ApiClient {
    use_context::<krishi_api::ApiClient>().unwrap_or_default()
}
