use rayon::prelude::*;
use wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

use crate::geometry::{Color, Rect, Vec2i, Vec2u};
use crate::layer::Layer;

/// Draw surface the window tree paints into every frame.
pub trait RenderTarget {
    fn size(&self) -> Vec2u;

    /// Alpha-blended fill, clipped to the surface.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Blits the visible area of `layer` with its top-left at `pos`.
    fn draw_layer(&mut self, pos: Vec2i, layer: &Layer);

    fn outline_rect(&mut self, rect: Rect, color: Color, thickness: u32) {
        let t = thickness.min(rect.size.x).min(rect.size.y);
        if t == 0 {
            return;
        }
        let Rect { pos, size } = rect;
        self.fill_rect(Rect::new(pos, Vec2u::new(size.x, t)), color);
        self.fill_rect(Rect::from_xywh(pos.x, rect.bottom() - t as i32, size.x, t), color);
        self.fill_rect(Rect::new(pos, Vec2u::new(t, size.y)), color);
        self.fill_rect(Rect::from_xywh(rect.right() - t as i32, pos.y, t, size.y), color);
    }
}

/// Software RGBA8 surface. Rows are padded to the texture copy alignment so
/// the buffer can be uploaded as-is.
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub pixels: Vec<u8>,
    pub dirty: bool,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = aligned_stride(width.max(1));
        Self {
            width,
            height,
            stride,
            pixels: vec![255; stride * height as usize],
            dirty: true,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Frame::new(width, height);
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_array();
        let row_bytes = self.width as usize * 4;
        self.pixels.par_chunks_mut(self.stride).for_each(|row| {
            for px in row[..row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        });
        self.dirty = true;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.stride + x as usize * 4;
        let px = &self.pixels[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Extract tight-packed RGBA pixels (without stride padding).
    pub fn extract_tight_pixels(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        let mut tight = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks(self.stride).take(self.height as usize) {
            tight.extend_from_slice(&row[..row_bytes]);
        }
        tight
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        rect.intersection(&Rect::new(Vec2i::default(), Vec2u::new(self.width, self.height)))
    }
}

fn blend_into(dst: &mut [u8], color: Color) {
    let out = color.blend_over(Color::rgba(dst[0], dst[1], dst[2], dst[3]));
    dst.copy_from_slice(&out.to_array());
}

impl RenderTarget for Frame {
    fn size(&self) -> Vec2u {
        Vec2u::new(self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clipped) = self.clip(rect) else {
            return;
        };
        if color.is_transparent() {
            return;
        }
        let x0 = clipped.pos.x as usize * 4;
        let x1 = clipped.right() as usize * 4;
        for row in self
            .pixels
            .chunks_mut(self.stride)
            .skip(clipped.pos.y as usize)
            .take(clipped.size.y as usize)
        {
            for px in row[x0..x1].chunks_exact_mut(4) {
                blend_into(px, color);
            }
        }
        self.dirty = true;
    }

    fn draw_layer(&mut self, pos: Vec2i, layer: &Layer) {
        let area = layer.area();
        let Some(clipped) = self.clip(Rect::new(pos, area.size)) else {
            return;
        };
        let x0 = clipped.pos.x;
        let x1 = clipped.right();
        self.pixels
            .par_chunks_mut(self.stride)
            .enumerate()
            .skip(clipped.pos.y as usize)
            .take(clipped.size.y as usize)
            .for_each(|(y, row)| {
                let src = layer.visible_row((y as i32 - pos.y) as u32);
                for x in x0..x1 {
                    let color = src[(x - pos.x) as usize];
                    if color.is_transparent() {
                        continue;
                    }
                    let idx = x as usize * 4;
                    blend_into(&mut row[idx..idx + 4], color);
                }
            });
        self.dirty = true;
    }
}

fn aligned_stride(width: u32) -> usize {
    let row = width as usize * 4;
    let align = COPY_BYTES_PER_ROW_ALIGNMENT as usize;
    row.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::CutRect;

    #[test]
    fn test_stride_is_aligned() {
        let frame = Frame::new(10, 3);
        assert_eq!(frame.stride % COPY_BYTES_PER_ROW_ALIGNMENT as usize, 0);
        assert!(frame.stride >= 40);
        assert_eq!(frame.extract_tight_pixels().len(), 10 * 3 * 4);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut frame = Frame::new(8, 8);
        frame.clear(Color::BLACK);
        frame.fill_rect(Rect::from_xywh(-4, 6, 6, 10), Color::rgb(255, 0, 0));
        assert_eq!(frame.pixel(0, 7), Some(Color::rgb(255, 0, 0)));
        assert_eq!(frame.pixel(1, 6), Some(Color::rgb(255, 0, 0)));
        assert_eq!(frame.pixel(2, 6), Some(Color::BLACK));
        assert_eq!(frame.pixel(0, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_layer_uses_visible_area() {
        let mut layer = Layer::new("l", Vec2u::new(8, 8), CutRect::new(Vec2u::new(4, 4), Vec2u::new(4, 4)));
        layer.set_full_pixel(Vec2u::new(5, 4), Color::rgb(0, 255, 0));
        layer.set_full_pixel(Vec2u::new(0, 0), Color::rgb(0, 0, 255));

        let mut frame = Frame::new(6, 6);
        frame.clear(Color::WHITE);
        frame.draw_layer(Vec2i::new(2, 2), &layer);

        assert_eq!(frame.pixel(3, 2), Some(Color::rgb(0, 255, 0)));
        assert_eq!(frame.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(frame.pixel(0, 0), Some(Color::WHITE));
    }
}
