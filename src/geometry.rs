use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// RGBA8 color. Alpha 0 marks an unwritten pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Source-over blend of `self` on top of `dst` (straight alpha).
    pub fn blend_over(self, dst: Color) -> Color {
        match self.a {
            0 => dst,
            255 => self,
            _ => {
                let sa = self.a as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    return Color::TRANSPARENT;
                }
                let mix = |s: u8, d: u8| {
                    let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                Color::rgba(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    (out_a * 255.0).round() as u8,
                )
            }
        }
    }

    /// Returns a copy with each color channel moved towards white (`amount > 0`)
    /// or black (`amount < 0`).
    pub fn shade(self, amount: i16) -> Color {
        let adjust = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Color::rgba(adjust(self.r), adjust(self.g), adjust(self.b), self.a)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

pub type Vec2i = Vec2<i32>;
pub type Vec2u = Vec2<u32>;
pub type Vec2f = Vec2<f32>;

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: AddAssign> AddAssign for Vec2<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Vec2u {
    pub fn to_i32(self) -> Vec2i {
        Vec2i::new(self.x as i32, self.y as i32)
    }

    pub fn to_f32(self) -> Vec2f {
        Vec2f::new(self.x as f32, self.y as f32)
    }

    /// Number of cells in a grid of this size.
    pub fn area(self) -> usize {
        self.x as usize * self.y as usize
    }

    pub fn min(self, other: Vec2u) -> Vec2u {
        Vec2u::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn saturating_sub(self, other: Vec2u) -> Vec2u {
        Vec2u::new(self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }
}

impl Vec2i {
    pub fn to_f32(self) -> Vec2f {
        Vec2f::new(self.x as f32, self.y as f32)
    }
}

impl Vec2f {
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2f) -> f32 {
        (other - self).length()
    }

    pub fn round_i32(self) -> Vec2i {
        Vec2i::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn clamp(self, min: f32, max: f32) -> Vec2f {
        Vec2f::new(self.x.clamp(min, max), self.y.clamp(min, max))
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2i,
    pub size: Vec2u,
}

impl Rect {
    pub const fn new(pos: Vec2i, size: Vec2u) -> Self {
        Self { pos, size }
    }

    pub const fn from_xywh(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self::new(Vec2i::new(x, y), Vec2u::new(w, h))
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x as i32
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y as i32
    }

    pub fn contains(&self, point: Vec2i) -> bool {
        point.x >= self.pos.x
            && point.y >= self.pos.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.pos.x.max(other.pos.x);
        let top = self.pos.y.max(other.pos.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::from_xywh(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::from_xywh(10, 10, 5, 5);
        assert!(rect.contains(Vec2i::new(10, 10)));
        assert!(rect.contains(Vec2i::new(14, 14)));
        assert!(!rect.contains(Vec2i::new(15, 14)));
        assert!(!rect.contains(Vec2i::new(9, 12)));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::from_xywh(0, 0, 10, 10);
        let b = Rect::from_xywh(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::from_xywh(5, 0, 5, 5)));
        assert_eq!(a.intersection(&Rect::from_xywh(20, 20, 2, 2)), None);
    }

    #[test]
    fn test_blend_over() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.blend_over(Color::WHITE), red);
        assert_eq!(Color::TRANSPARENT.blend_over(red), red);

        let half = Color::rgba(0, 0, 0, 128).blend_over(Color::WHITE);
        assert_eq!(half.a, 255);
        assert!(half.r > 120 && half.r < 135);

        let onto_empty = Color::rgba(10, 20, 30, 100).blend_over(Color::TRANSPARENT);
        assert_eq!(onto_empty, Color::rgba(10, 20, 30, 100));
    }

    #[test]
    fn test_vec_arithmetic() {
        let v = Vec2u::new(64, 32) * 2;
        assert_eq!(v, Vec2u::new(128, 64));
        assert_eq!(v.area(), 8192);
        assert_eq!(Vec2u::new(3, 9).saturating_sub(Vec2u::new(5, 4)), Vec2u::new(0, 5));
        assert_eq!(Vec2f::new(1.4, -0.6).round_i32(), Vec2i::new(1, -1));
    }
}
