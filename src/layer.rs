use serde::{Deserialize, Serialize};

use crate::geometry::{Color, Vec2i, Vec2u};

/// Window into a layer's full surface: `offset` is the full-surface cell shown
/// at screen-relative (0, 0), `size` the number of cells mapped on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRect {
    pub offset: Vec2u,
    pub size: Vec2u,
}

impl CutRect {
    pub const fn new(offset: Vec2u, size: Vec2u) -> Self {
        Self { offset, size }
    }
}

/// One raster layer of a canvas.
///
/// The layer stores a virtual surface (`full_size`) that is usually larger than
/// what is on screen. Pixel accessors take screen-relative coordinates and go
/// through the visible [`CutRect`]; scrolling only moves that window, it never
/// touches the pixel storage.
#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    full_size: Vec2u,
    pixels: Vec<Color>, // row-major, full_size.x * full_size.y
    area: CutRect,
}

impl Layer {
    pub fn new(name: impl Into<String>, full_size: Vec2u, area: CutRect) -> Self {
        let mut layer = Self {
            name: name.into(),
            visible: true,
            full_size,
            pixels: vec![Color::TRANSPARENT; full_size.area()],
            area: CutRect::default(),
        };
        layer.change_area(area);
        layer
    }

    /// Build a layer from tight-packed RGBA8 bytes. The whole surface is visible.
    /// Returns `None` when `bytes` does not hold `width * height` pixels.
    pub fn from_rgba(name: impl Into<String>, width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        let size = Vec2u::new(width, height);
        if bytes.len() != size.area() * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Color::rgba(c[0], c[1], c[2], c[3]))
            .collect();
        Some(Self {
            name: name.into(),
            visible: true,
            full_size: size,
            pixels,
            area: CutRect::new(Vec2u::default(), size),
        })
    }

    pub fn full_size(&self) -> Vec2u {
        self.full_size
    }

    pub fn area(&self) -> CutRect {
        self.area
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    fn full_index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.full_size.x && y < self.full_size.y {
            Some(y as usize * self.full_size.x as usize + x as usize)
        } else {
            None
        }
    }

    fn screen_index(&self, pos: Vec2i) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        if x >= self.area.size.x || y >= self.area.size.y {
            return None;
        }
        self.full_index(self.area.offset.x + x, self.area.offset.y + y)
    }

    /// Pixel at a screen-relative position, transparent outside the visible area.
    pub fn get_pixel(&self, pos: Vec2i) -> Color {
        self.screen_index(pos)
            .map_or(Color::TRANSPARENT, |idx| self.pixels[idx])
    }

    /// Overwrites the pixel at a screen-relative position. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, pos: Vec2i, color: Color) {
        if let Some(idx) = self.screen_index(pos) {
            self.pixels[idx] = color;
        }
    }

    pub fn get_full_pixel(&self, pos: Vec2u) -> Color {
        self.full_index(pos.x, pos.y)
            .map_or(Color::TRANSPARENT, |idx| self.pixels[idx])
    }

    pub fn set_full_pixel(&mut self, pos: Vec2u, color: Color) {
        if let Some(idx) = self.full_index(pos.x, pos.y) {
            self.pixels[idx] = color;
        }
    }

    /// Visible cells of screen row `y`, or an empty slice when `y` is off screen.
    pub fn visible_row(&self, y: u32) -> &[Color] {
        if y >= self.area.size.y || self.area.size.x == 0 {
            return &[];
        }
        match self.full_index(self.area.offset.x, self.area.offset.y + y) {
            Some(start) => &self.pixels[start..start + self.area.size.x as usize],
            None => &[],
        }
    }

    /// Reallocates the full surface. Pixels inside both the old and the new
    /// bounds keep their (x, y); everything else starts transparent.
    pub fn change_full_size(&mut self, new_size: Vec2u) {
        if new_size == self.full_size {
            return;
        }
        let mut pixels = vec![Color::TRANSPARENT; new_size.area()];
        let keep = self.full_size.min(new_size);
        for y in 0..keep.y as usize {
            let src = y * self.full_size.x as usize;
            let dst = y * new_size.x as usize;
            pixels[dst..dst + keep.x as usize]
                .copy_from_slice(&self.pixels[src..src + keep.x as usize]);
        }
        self.pixels = pixels;
        self.full_size = new_size;
        self.change_area(self.area);
    }

    /// Moves the visible window. The window is clipped to the full surface.
    pub fn change_area(&mut self, area: CutRect) {
        let offset = area.offset.min(self.full_size);
        let size = area.size.min(self.full_size.saturating_sub(offset));
        self.area = CutRect::new(offset, size);
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Copies every pixel of `source` that falls inside this layer's surface.
    pub fn copy_from(&mut self, source: &Layer) {
        let keep = self.full_size.min(source.full_size);
        for y in 0..keep.y as usize {
            let src = y * source.full_size.x as usize;
            let dst = y * self.full_size.x as usize;
            self.pixels[dst..dst + keep.x as usize]
                .copy_from_slice(&source.pixels[src..src + keep.x as usize]);
        }
    }

    /// Tight-packed RGBA8 bytes of the full surface.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(|c| c.is_transparent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(full: (u32, u32), offset: (u32, u32), size: (u32, u32)) -> Layer {
        Layer::new(
            "test",
            Vec2u::new(full.0, full.1),
            CutRect::new(Vec2u::new(offset.0, offset.1), Vec2u::new(size.0, size.1)),
        )
    }

    #[test]
    fn test_set_get_through_window() {
        for &(fw, fh, vw, vh) in &[(8, 8, 8, 8), (16, 12, 5, 7), (40, 30, 20, 15)] {
            for &(sx, sy) in &[(0.0f32, 0.0f32), (0.5, 0.25), (1.0, 1.0)] {
                let offset = Vec2u::new(((fw - vw) as f32 * sx) as u32, ((fh - vh) as f32 * sy) as u32);
                let mut l = layer((fw, fh), (offset.x, offset.y), (vw, vh));
                let color = Color::rgb(7, 8, 9);
                let p = Vec2i::new(vw as i32 - 1, vh as i32 / 2);
                l.set_pixel(p, color);
                assert_eq!(l.get_pixel(p), color);

                let written: Vec<usize> = l
                    .pixels()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_transparent())
                    .map(|(i, _)| i)
                    .collect();
                let expected = (offset.y + p.y as u32) as usize * fw as usize + (offset.x + p.x as u32) as usize;
                assert_eq!(written, vec![expected]);
            }
        }
    }

    #[test]
    fn test_out_of_area_access() {
        let mut l = layer((10, 10), (2, 2), (4, 4));
        l.set_pixel(Vec2i::new(4, 0), Color::WHITE);
        l.set_pixel(Vec2i::new(-1, 0), Color::WHITE);
        assert!(l.is_empty());
        assert_eq!(l.get_pixel(Vec2i::new(0, 4)), Color::TRANSPARENT);
        assert_eq!(l.get_pixel(Vec2i::new(-3, -3)), Color::TRANSPARENT);
    }

    #[test]
    fn test_change_full_size_preserves_content() {
        let (w, h) = (6u32, 4u32);
        let mut l = layer((w, h), (0, 0), (w, h));
        for y in 0..h {
            for x in 0..w {
                l.set_full_pixel(Vec2u::new(x, y), Color::rgba(x as u8, y as u8, 1, 255));
            }
        }
        l.change_full_size(Vec2u::new(9, 7));
        for y in 0..7 {
            for x in 0..9 {
                let c = l.get_full_pixel(Vec2u::new(x, y));
                if x < w && y < h {
                    assert_eq!(c, Color::rgba(x as u8, y as u8, 1, 255));
                } else {
                    assert_eq!(c, Color::TRANSPARENT);
                }
            }
        }
    }

    #[test]
    fn test_shrink_clips_area() {
        let mut l = layer((20, 20), (10, 10), (10, 10));
        l.change_full_size(Vec2u::new(15, 12));
        assert_eq!(l.area(), CutRect::new(Vec2u::new(10, 10), Vec2u::new(5, 2)));
    }

    #[test]
    fn test_visible_row() {
        let mut l = layer((6, 3), (2, 1), (3, 2));
        l.set_pixel(Vec2i::new(1, 1), Color::BLACK);
        let row = l.visible_row(1);
        assert_eq!(row.len(), 3);
        assert_eq!(row[1], Color::BLACK);
        assert!(l.visible_row(2).is_empty());
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        assert!(Layer::from_rgba("bad", 2, 2, &[0; 15]).is_none());
        let l = Layer::from_rgba("ok", 2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(l.get_pixel(Vec2i::new(1, 0)), Color::rgba(5, 6, 7, 8));
        assert_eq!(l.to_rgba_bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
