//! Elevation profile projection.
//!
//! Maps a trail's elevation samples onto a `width` x `height` drawing area as
//! an SVG-style polyline. Distance runs left to right; higher elevation sits
//! closer to the top (smaller y).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::trail::ElevationPoint;

/// Smallest vertical span, in metres, that fills the full chart height.
///
/// Keeps near-flat profiles from being stretched into noise.
pub const MIN_VERTICAL_RANGE_M: f64 = 40.0;

/// Drawing area in abstract units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent; y grows downward.
    pub height: f64,
}

impl Viewport {
    /// The detail-view chart.
    pub const DETAIL: Self = Self::new(100.0, 100.0);

    /// The compact chart shown in list rows.
    pub const THUMBNAIL: Self = Self::new(100.0, 24.0);

    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DETAIL
    }
}

/// A projected vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// A projected elevation profile, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationPath {
    /// Vertices in distance order.
    pub points: Vec<PathPoint>,
    /// Lowest sampled elevation in metres.
    pub min_m: f64,
    /// Highest sampled elevation in metres.
    pub max_m: f64,
    /// Viewport the points were projected into.
    pub viewport: Viewport,
}

impl ElevationPath {
    /// Path data for the profile line: `M x,y L x,y ...`, two decimals.
    #[must_use]
    pub fn line(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{:.2},{:.2}", p.x, p.y);
        }
        d
    }

    /// Path data for the shaded area under the line, closed along the bottom edge.
    #[must_use]
    pub fn area(&self) -> String {
        let Viewport { width, height } = self.viewport;
        format!(
            "{} L{},{} L0,{} Z",
            self.line(),
            fmt_coord(width),
            fmt_coord(height),
            fmt_coord(height)
        )
    }

    /// Caption such as `580 m • 612 m`, whole metres.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{:.0} m • {:.0} m", self.min_m.round(), self.max_m.round())
    }
}

/// Bottom-edge coordinates are written without trailing zeros (`L100,100`).
fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Project `samples` into `viewport`.
///
/// Returns `None` when there are fewer than two samples. Input order does not
/// matter; samples are sorted by distance first.
#[must_use]
pub fn project(samples: &[ElevationPoint], viewport: Viewport) -> Option<ElevationPath> {
    if samples.len() < 2 {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.km.total_cmp(&b.km));

    let min_m = sorted.iter().map(|p| p.m).fold(f64::INFINITY, f64::min);
    let max_m = sorted.iter().map(|p| p.m).fold(f64::NEG_INFINITY, f64::max);
    let range = if max_m > min_m {
        (max_m - min_m).max(MIN_VERTICAL_RANGE_M)
    } else {
        1.0
    };

    let last_km = sorted.last().map_or(0.0, |p| p.km);
    let max_km = if last_km == 0.0 { 1.0 } else { last_km };

    let Viewport { width, height } = viewport;
    let points = sorted
        .iter()
        .map(|p| PathPoint {
            x: round2((p.km / max_km) * width),
            y: round2(height - ((p.m - min_m) / range) * height),
        })
        .collect();

    Some(ElevationPath {
        points,
        min_m,
        max_m,
        viewport,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(samples: &[(f64, f64)]) -> Vec<ElevationPoint> {
        samples
            .iter()
            .map(|&(km, m)| ElevationPoint::new(km, m))
            .collect()
    }

    #[test]
    fn test_unsorted_profile() {
        let samples = pts(&[(0.0, 580.0), (3.1, 600.0), (1.6, 605.0)]);
        let path = project(&samples, Viewport::DETAIL).unwrap();

        assert_eq!(path.min_m, 580.0);
        assert_eq!(path.max_m, 605.0);

        let xs: Vec<f64> = path.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 51.61, 100.0]);

        // 605 sits 25 m above the floor of a 40 m range.
        assert_eq!(path.points[0], PathPoint { x: 0.0, y: 100.0 });
        assert_eq!(path.points[1].y, 37.5);
        assert_eq!(path.points[2], PathPoint { x: 100.0, y: 50.0 });

        assert_eq!(path.line(), "M0.00,100.00 L51.61,37.50 L100.00,50.00");
    }

    #[test]
    fn test_too_few_points() {
        assert!(project(&[], Viewport::DETAIL).is_none());
        assert!(project(&pts(&[(0.0, 100.0)]), Viewport::DETAIL).is_none());
    }

    #[test]
    fn test_order_independent() {
        let a = pts(&[(0.0, 300.0), (1.0, 340.0), (2.1, 390.0), (3.2, 420.0)]);
        let b = pts(&[(3.2, 420.0), (0.0, 300.0), (2.1, 390.0), (1.0, 340.0)]);
        assert_eq!(
            project(&a, Viewport::DETAIL),
            project(&b, Viewport::DETAIL)
        );
    }

    #[test]
    fn test_large_range_uses_actual_span() {
        let samples = pts(&[(0.0, 300.0), (4.2, 420.0)]);
        let path = project(&samples, Viewport::DETAIL).unwrap();
        assert_eq!(path.points[0].y, 100.0);
        assert_eq!(path.points[1].y, 0.0);
    }

    #[test]
    fn test_flat_profile_sits_on_bottom() {
        let samples = pts(&[(0.0, 500.0), (1.0, 500.0), (2.0, 500.0)]);
        let path = project(&samples, Viewport::THUMBNAIL).unwrap();
        assert!(path.points.iter().all(|p| p.y == 24.0));
        assert_eq!(path.caption(), "500 m • 500 m");
    }

    #[test]
    fn test_zero_distance_does_not_divide_by_zero() {
        let samples = pts(&[(0.0, 100.0), (0.0, 200.0)]);
        let path = project(&samples, Viewport::DETAIL).unwrap();
        assert!(path.points.iter().all(|p| p.x == 0.0));
        assert!(path.points.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_area_closes_along_bottom() {
        let samples = pts(&[(0.0, 580.0), (3.1, 600.0)]);
        let path = project(&samples, Viewport::DETAIL).unwrap();
        assert_eq!(
            path.area(),
            "M0.00,100.00 L100.00,50.00 L100,100 L0,100 Z"
        );

        let thumb = project(&samples, Viewport::THUMBNAIL).unwrap();
        assert!(thumb.area().ends_with(" L100,24 L0,24 Z"));
    }

    #[test]
    fn test_caption_rounds() {
        let samples = pts(&[(0.0, 579.6), (1.0, 620.4)]);
        let path = project(&samples, Viewport::DETAIL).unwrap();
        assert_eq!(path.caption(), "580 m • 620 m");
    }

    #[test]
    fn test_custom_viewport_scales() {
        let samples = pts(&[(0.0, 0.0), (2.0, 100.0)]);
        let path = project(&samples, Viewport::new(200.0, 50.0)).unwrap();
        assert_eq!(path.points[1], PathPoint { x: 200.0, y: 0.0 });
        assert_eq!(path.viewport, Viewport::new(200.0, 50.0));
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(100.0), "100");
        assert_eq!(fmt_coord(24.5), "24.5");
        assert_eq!(fmt_coord(0.0), "0");
    }
}
