//! Chart handle registry
//!
//! One slot per attached canvas, each holding at most one live chart.
//! `replace` destroys whatever is bound to the slot before the builder runs,
//! so two builders sharing a canvas can never overlay each other.

use crate::CanvasId;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// A live chart bound to a canvas
pub trait ChartInstance {
    /// Release everything bound to the canvas
    fn destroy(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("chart canvas `{0}` is not in the document")]
    CanvasMissing(CanvasId),
}

#[derive(Debug)]
pub struct ChartRegistry<H: ChartInstance> {
    slots: BTreeMap<CanvasId, Option<H>>,
}

impl<H: ChartInstance> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ChartInstance> ChartRegistry<H> {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Register a canvas as present; an existing slot is left untouched
    pub fn attach(&mut self, id: CanvasId) {
        trace!(canvas = %id, "attach");
        self.slots.entry(id).or_insert(None);
    }

    /// Remove a canvas, destroying its chart
    pub fn detach(&mut self, id: CanvasId) {
        if let Some(Some(mut chart)) = self.slots.remove(&id) {
            chart.destroy();
        }
        trace!(canvas = %id, "detach");
    }

    pub fn is_attached(&self, id: CanvasId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Destroy the bound chart, then bind the one produced by `build`
    pub fn replace<F>(&mut self, id: CanvasId, build: F) -> Result<&H, ChartError>
    where
        F: FnOnce() -> H,
    {
        let slot = self.slots.get_mut(&id).ok_or(ChartError::CanvasMissing(id))?;

        if let Some(mut previous) = slot.take() {
            debug!(canvas = %id, "destroying previous chart");
            previous.destroy();
        }

        Ok(slot.insert(build()))
    }

    /// Destroy the bound chart and leave the slot empty
    pub fn destroy(&mut self, id: CanvasId) {
        if let Some(mut chart) = self.slots.get_mut(&id).and_then(Option::take) {
            chart.destroy();
        }
    }

    pub fn destroy_all(&mut self) {
        for slot in self.slots.values_mut() {
            if let Some(mut chart) = slot.take() {
                chart.destroy();
            }
        }
    }

    pub fn get(&self, id: CanvasId) -> Option<&H> {
        self.slots.get(&id).and_then(Option::as_ref)
    }

    /// Number of charts currently bound
    pub fn live_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts live instances across all canvases
    struct Probe {
        name: &'static str,
        live: Rc<Cell<i32>>,
    }

    impl Probe {
        fn new(name: &'static str, live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self { name, live: live.clone() }
        }
    }

    impl ChartInstance for Probe {
        fn destroy(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[test]
    fn test_replace_twice_leaves_one_instance() {
        let live = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();
        registry.attach(CanvasId::PriceRanges);

        registry.replace(CanvasId::PriceRanges, || Probe::new("a", &live)).unwrap();
        registry.replace(CanvasId::PriceRanges, || Probe::new("b", &live)).unwrap();

        assert_eq!(live.get(), 1);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.get(CanvasId::PriceRanges).map(|p| p.name), Some("b"));
    }

    #[test]
    fn test_shared_canvas_builders_are_exclusive() {
        let live = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();
        registry.attach(CanvasId::MarketComparison);

        registry
            .replace(CanvasId::MarketComparison, || Probe::new("comparison", &live))
            .unwrap();
        registry
            .replace(CanvasId::MarketComparison, || Probe::new("min-max", &live))
            .unwrap();

        assert_eq!(live.get(), 1);
        assert_eq!(
            registry.get(CanvasId::MarketComparison).map(|p| p.name),
            Some("min-max")
        );
    }

    #[test]
    fn test_missing_canvas_is_reported() {
        let live = Rc::new(Cell::new(0));
        let mut registry: ChartRegistry<Probe> = ChartRegistry::new();

        let result = registry.replace(CanvasId::SoilRadar, || Probe::new("x", &live));
        assert_eq!(result.err(), Some(ChartError::CanvasMissing(CanvasId::SoilRadar)));
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_detach_and_destroy_release_charts() {
        let live = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();
        for id in CanvasId::MANDI {
            registry.attach(id);
            registry.replace(id, || Probe::new("m", &live)).unwrap();
        }
        assert_eq!(live.get(), 4);

        registry.detach(CanvasId::PriceRanges);
        assert!(!registry.is_attached(CanvasId::PriceRanges));
        assert_eq!(live.get(), 3);

        registry.destroy(CanvasId::MarketComparison);
        assert!(registry.is_attached(CanvasId::MarketComparison));
        assert_eq!(live.get(), 2);

        registry.destroy_all();
        assert_eq!(live.get(), 0);
        assert_eq!(registry.live_count(), 0);
    }
}
