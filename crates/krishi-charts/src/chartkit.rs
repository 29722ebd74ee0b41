//! # chartkit
//!
//! Chart primitives shared by every renderer: axis scales, SVG path
//! assembly, arc geometry, number formatting.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

/// Ticks drawn on a value axis that has no pinned maximum
pub const VALUE_TICKS: usize = 5;

// ============================================================================
// SCALES
// ============================================================================

/// Maps a data value to an offset along an axis
pub trait Scale {
    fn scale(&self, value: f64) -> f64;
}

/// Zero-based value axis. Every chart here begins at zero, so only the top
/// of the domain varies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    max: f64,
    length: f64,
    step: Option<f64>,
}

impl ValueScale {
    /// Axis topped exactly at `max`
    pub fn pinned(max: f64, length: f64) -> Self {
        let max = if max > 0.0 && max.is_finite() { max } else { 1.0 };
        Self {
            max,
            length,
            step: round_step(max, VALUE_TICKS),
        }
    }

    /// Axis whose top is `max` raised to the next round step
    pub fn rounded(max: f64, length: f64) -> Self {
        let mut axis = Self::pinned(max, length);
        if let Some(step) = axis.step {
            axis.max = (axis.max / step).ceil() * step;
        }
        axis
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Round tick values from zero up to the axis top
    pub fn ticks(&self) -> Vec<f64> {
        let Some(step) = self.step else {
            return vec![0.0];
        };
        let count = (self.max / step + 1e-9).floor() as usize;
        (0..=count).map(|i| i as f64 * step).collect()
    }
}

impl Scale for ValueScale {
    fn scale(&self, value: f64) -> f64 {
        value / self.max * self.length
    }
}

/// Step of 1, 2 or 5 times a power of ten giving roughly `count` intervals
fn round_step(span: f64, count: usize) -> Option<f64> {
    if span <= 0.0 || count == 0 || !span.is_finite() {
        return None;
    }

    let rough = span / count as f64;
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let multiple = [1.0, 2.0, 5.0]
        .into_iter()
        .find(|m| rough / magnitude <= *m)
        .unwrap_or(10.0);
    Some(multiple * magnitude)
}

/// Evenly spaced category bands (commodities, markets, varieties)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    offset: f64,
    step: f64,
    width: f64,
}

impl Bands {
    /// Share of each step left empty between neighbouring bands
    const GAP: f64 = 0.2;
    /// Share of a step kept free at either end of the axis
    const EDGE: f64 = 0.1;

    pub fn across(count: usize, length: f64) -> Self {
        if count == 0 {
            return Self {
                offset: 0.0,
                step: 0.0,
                width: 0.0,
            };
        }
        let step = length / (count as f64 - Self::GAP + 2.0 * Self::EDGE).max(1.0);
        Self {
            offset: Self::EDGE * step,
            step,
            width: step * (1.0 - Self::GAP),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn start(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.step
    }

    pub fn center(&self, index: usize) -> f64 {
        self.start(index) + self.width / 2.0
    }
}

// ============================================================================
// SVG PATHS
// ============================================================================

/// `d` attribute under construction
#[derive(Debug, Clone)]
pub struct SvgPath(String);

impl SvgPath {
    pub fn at(x: f64, y: f64) -> Self {
        let mut d = String::with_capacity(96);
        let _ = write!(d, "M{:.2},{:.2}", x, y);
        Self(d)
    }

    pub fn line(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.0, "L{:.2},{:.2}", x, y);
        self
    }

    /// Circular arc of radius `r` ending at (x, y)
    pub fn arc(mut self, r: f64, large: bool, clockwise: bool, x: f64, y: f64) -> Self {
        let _ = write!(
            self.0,
            "A{:.2},{:.2},0,{},{},{:.2},{:.2}",
            r, r, large as u8, clockwise as u8, x, y
        );
        self
    }

    pub fn close(mut self) -> String {
        self.0.push('Z');
        self.0
    }
}

/// Closed polygon through the given points
pub fn polygon_path(points: &[(f64, f64)]) -> String {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return String::new();
    };

    rest.iter()
        .fold(SvgPath::at(x0, y0), |path, &(x, y)| path.line(x, y))
        .close()
}

// ============================================================================
// ARC GEOMETRY (pie, doughnut, polar area, radar)
// ============================================================================

/// Point at `angle` radians, measured clockwise from twelve o'clock
pub fn polar_point(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Annular sector path; `inner = 0` yields a plain pie slice
pub fn arc_path(cx: f64, cy: f64, inner: f64, outer: f64, start: f64, end: f64) -> String {
    // a full turn would start and end on the same point and draw nothing
    let end = if end - start >= TAU { start + TAU - 1e-4 } else { end };
    let large = end - start > PI;

    let (ox0, oy0) = polar_point(cx, cy, outer, start);
    let (ox1, oy1) = polar_point(cx, cy, outer, end);

    if inner <= 0.0 {
        return SvgPath::at(cx, cy)
            .line(ox0, oy0)
            .arc(outer, large, true, ox1, oy1)
            .close();
    }

    let (ix1, iy1) = polar_point(cx, cy, inner, end);
    let (ix0, iy0) = polar_point(cx, cy, inner, start);

    SvgPath::at(ox0, oy0)
        .arc(outer, large, true, ox1, oy1)
        .line(ix1, iy1)
        .arc(inner, large, false, ix0, iy0)
        .close()
}

/// Start/end angles of slices proportional to `values`
pub fn slice_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    values
        .iter()
        .map(|v| {
            let sweep = v.max(0.0) / total * TAU;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Compact axis label: 12500 -> "12.5K"
pub fn format_axis_value(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 10_000_000.0 {
        format!("{}{:.1}Cr", sign, abs / 10_000_000.0)
    } else if abs >= 100_000.0 {
        format!("{}{:.1}L", sign, abs / 100_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{:.1}K", sign, abs / 1_000.0)
    } else if abs.fract() == 0.0 {
        format!("{}{}", sign, abs as i64)
    } else {
        format!("{}{:.1}", sign, abs)
    }
}

/// Round percentage share of `value` within `total`
pub fn percent_of(value: f64, total: f64) -> i64 {
    if total == 0.0 {
        return 0;
    }
    (value / total * 100.0).round() as i64
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_scale() {
        let axis = ValueScale::pinned(100.0, 500.0);
        assert_eq!(axis.scale(0.0), 0.0);
        assert_eq!(axis.scale(50.0), 250.0);
        assert_eq!(axis.ticks(), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

        // an empty dataset still yields a drawable axis
        assert_eq!(ValueScale::pinned(0.0, 10.0).max(), 1.0);
    }

    #[test]
    fn test_rounded_axis_top() {
        let axis = ValueScale::rounded(2340.0, 100.0);
        assert_eq!(axis.max(), 2500.0);
        assert_eq!(axis.ticks(), vec![0.0, 500.0, 1000.0, 1500.0, 2000.0, 2500.0]);
    }

    #[test]
    fn test_bands_fit_length() {
        let bands = Bands::across(4, 100.0);
        let last_end = bands.start(3) + bands.width();
        assert!(bands.start(0) > 0.0);
        assert!(last_end <= 100.0 + 1e-9);
        assert_eq!(bands.center(0), bands.start(0) + 10.0);
        assert_eq!(Bands::across(0, 100.0).width(), 0.0);
    }

    #[test]
    fn test_slice_angles_cover_circle() {
        let slices = slice_angles(&[1.0, 1.0, 2.0]);
        assert_eq!(slices.len(), 3);
        assert!((slices[2].0 - PI).abs() < 1e-9);
        assert!((slices[2].1 - TAU).abs() < 1e-9);
        assert!(slice_angles(&[0.0, 0.0]).is_empty());
    }

    #[test]
    fn test_arc_paths() {
        let pie = arc_path(50.0, 50.0, 0.0, 40.0, 0.0, PI / 2.0);
        assert!(pie.starts_with("M50.00,50.00L50.00,10.00A40.00,40.00,0,0,1"));
        assert!(pie.ends_with('Z'));

        let ring = arc_path(50.0, 50.0, 20.0, 40.0, 0.0, TAU);
        assert!(ring.contains("A20.00,20.00"));
    }

    #[test]
    fn test_polygon_path() {
        let path = polygon_path(&[(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)]);
        assert_eq!(path, "M0.00,0.00L10.00,0.00L5.00,5.00Z");
        assert!(polygon_path(&[]).is_empty());
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(2500.0), "2.5K");
        assert_eq!(format_axis_value(250_000.0), "2.5L");
        assert_eq!(format_axis_value(40.0), "40");
        assert_eq!(format_axis_value(0.5), "0.5");
        assert_eq!(percent_of(1.0, 3.0), 33);
    }
}
