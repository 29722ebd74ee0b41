//! # krishi-charts
//!
//! SVG charting for the mandi dashboard and the fertilizer report, built with Leptos.
//!
//! ## Architecture
//!
//! Builders in `mandi` and `fertilizer` turn wire data into `ChartSpec`
//! values. A `ChartRegistry` binds at most one chart to each mounted canvas
//! and destroys the previous one before a rebuild. `render` draws specs.
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, arcs, formatters
//! - `model` - Chart model and canvas ids
//! - `registry` - Canvas slot lifecycle
//! - `mandi` - Mandi price chart builders
//! - `fertilizer` - Soil and fertilizer chart builders
//! - `render` - SVG components

pub mod chartkit;
pub mod fertilizer;
pub mod mandi;
pub mod model;
pub mod registry;
pub mod render;

pub use chartkit::*;
pub use model::*;
pub use registry::*;
pub use render::*;

// Re-export colors from krishi-core for convenience
pub use krishi_core::colors;

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::new(20.0, 20.0, 40.0, 60.0)
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// SVG transform for inner chart area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_area_never_negative() {
        let dims = ChartDimensions::new(50.0, 30.0).with_margin(ChartMargin::uniform(40.0));
        assert_eq!(dims.inner_width(), 0.0);
        assert_eq!(dims.inner_height(), 0.0);
        assert_eq!(dims.viewbox(), "0 0 50 30");
    }
}
