//! # krishi-state
//!
//! View state for the Krishi Mitra web client.
//! Controllers here are plain structs (testable without a browser); pages
//! wrap them in Leptos signals and share the app-level state via context.

pub mod chat;
pub mod mandi;
pub mod paginator;
pub mod soil;

pub use chat::*;
pub use mandi::*;
pub use paginator::*;
pub use soil::*;

use krishi_charts::SvgRegistry;
use krishi_core::Language;
use leptos::prelude::*;

/// Configuration constants
pub const ROWS_PER_PAGE: usize = 10;
pub const PAGE_WINDOW: usize = 5;

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global application state with reactive signals
#[derive(Clone)]
pub struct AppState {
    /// Active UI language
    pub language: RwSignal<Language>,
    /// Chart slots of the mounted page
    pub charts: RwSignal<SvgRegistry>,
    /// Current error message
    pub error: RwSignal<Option<String>>,
    /// Blocking loading overlay
    pub loading: RwSignal<bool>,
}

impl AppState {
    pub fn new(language: Language) -> Self {
        Self {
            language: RwSignal::new(language),
            charts: RwSignal::new(SvgRegistry::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Set error message
    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
    }

    /// Clear error
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    // ========================================================================
    // Loading State
    // ========================================================================

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    // ========================================================================
    // Language
    // ========================================================================

    pub fn toggle_language(&self) {
        self.language.update(|lang| *lang = lang.toggle());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide app state context to component tree
pub fn provide_app_state(language: Language) -> AppState {
    let state = AppState::new(language);
    provide_context(state.clone());
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

