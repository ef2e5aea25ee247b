use std::collections::VecDeque;

use crate::geometry::Vec2f;

/// Uniform Catmull-Rom spline over the last four pushed points.
///
/// With points `p0..p3` the curve segment runs from `p1` (t = 1) to `p2`
/// (t = 2); `p0` and `p3` only shape the tangents.
#[derive(Clone, Debug, Default)]
pub struct CatmullRom {
    points: VecDeque<Vec2f>,
}

impl CatmullRom {
    pub const CAPACITY: usize = 4;

    pub fn new() -> Self {
        Self { points: VecDeque::with_capacity(Self::CAPACITY) }
    }

    /// Adds a point, dropping the oldest once four are held.
    pub fn push(&mut self, point: Vec2f) {
        if self.points.len() == Self::CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.points.len() == Self::CAPACITY
    }

    pub fn point(&self, index: usize) -> Option<Vec2f> {
        self.points.get(index).copied()
    }

    pub fn last(&self) -> Option<Vec2f> {
        self.points.back().copied()
    }

    /// Point on the middle segment for `t` in `[1, 2]`, or `None` until four
    /// points are held. `t` is clamped.
    pub fn at(&self, t: f32) -> Option<Vec2f> {
        if !self.is_ready() {
            return None;
        }
        let u = t.clamp(1.0, 2.0) - 1.0;
        let (p0, p1, p2, p3) = (self.points[0], self.points[1], self.points[2], self.points[3]);
        let u2 = u * u;
        let u3 = u2 * u;
        let blend = |a: f32, b: f32, c: f32, d: f32| {
            0.5 * (2.0 * b
                + (c - a) * u
                + (2.0 * a - 5.0 * b + 4.0 * c - d) * u2
                + (3.0 * b - a - 3.0 * c + d) * u3)
        };
        Some(Vec2f::new(
            blend(p0.x, p1.x, p2.x, p3.x),
            blend(p0.y, p1.y, p2.y, p3.y),
        ))
    }

    /// Points along the middle segment, roughly `spacing` apart, including
    /// both endpoints.
    pub fn samples(&self, spacing: f32) -> Vec<Vec2f> {
        if !self.is_ready() {
            return Vec::new();
        }
        let chord = self.points[1].distance(self.points[2]);
        let steps = (chord / spacing.max(0.1)).ceil().max(1.0) as usize;
        (0..=steps)
            .filter_map(|i| self.at(1.0 + i as f32 / steps as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spline(points: [(f32, f32); 4]) -> CatmullRom {
        let mut s = CatmullRom::new();
        for (x, y) in points {
            s.push(Vec2f::new(x, y));
        }
        s
    }

    fn close(a: Vec2f, b: Vec2f) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_not_ready_below_four_points() {
        let mut s = CatmullRom::new();
        s.push(Vec2f::new(0.0, 0.0));
        s.push(Vec2f::new(1.0, 0.0));
        s.push(Vec2f::new(2.0, 0.0));
        assert!(!s.is_ready());
        assert!(s.at(1.5).is_none());
        assert!(s.samples(1.0).is_empty());
    }

    #[test]
    fn test_segment_passes_through_inner_points() {
        let s = spline([(0.0, 0.0), (10.0, 5.0), (20.0, -5.0), (30.0, 0.0)]);
        assert!(close(s.at(1.0).unwrap(), Vec2f::new(10.0, 5.0)));
        assert!(close(s.at(2.0).unwrap(), Vec2f::new(20.0, -5.0)));
    }

    #[test]
    fn test_collinear_points_stay_on_line() {
        let s = spline([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let mid = s.at(1.5).unwrap();
        assert!(close(mid, Vec2f::new(1.5, 1.5)));
    }

    #[test]
    fn test_push_keeps_last_four() {
        let mut s = spline([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        s.push(Vec2f::new(4.0, 0.0));
        assert_eq!(s.len(), 4);
        assert_eq!(s.point(0), Some(Vec2f::new(1.0, 0.0)));
        assert_eq!(s.last(), Some(Vec2f::new(4.0, 0.0)));
    }

    #[test]
    fn test_samples_cover_segment() {
        let s = spline([(0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (10.0, 0.0)]);
        let pts = s.samples(1.0);
        assert_eq!(pts.len(), 11);
        assert!(close(pts[0], Vec2f::new(0.0, 0.0)));
        assert!(close(*pts.last().unwrap(), Vec2f::new(10.0, 0.0)));
        for pair in pts.windows(2) {
            assert!(pair[0].distance(pair[1]) <= 2.0);
        }
    }
}
