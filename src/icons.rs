use crate::geometry::{Color, Rect, Vec2i};
use crate::render::RenderTarget;

/// 5x5 pixel glyph used as a button label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph([u8; 25]);

impl Glyph {
    pub const SIZE: u32 = 5;

    pub fn for_char(ch: char) -> Option<Glyph> {
        let pattern = match ch {
            'B' => [
                1, 1, 1, 1, 0,
                1, 0, 0, 0, 1,
                1, 1, 1, 1, 0,
                1, 0, 0, 0, 1,
                1, 1, 1, 1, 0,
            ],
            'E' => [
                1, 1, 1, 1, 1,
                1, 0, 0, 0, 0,
                1, 1, 1, 1, 0,
                1, 0, 0, 0, 0,
                1, 1, 1, 1, 1,
            ],
            'G' => [
                0, 1, 1, 1, 1,
                1, 0, 0, 0, 0,
                1, 0, 1, 1, 1,
                1, 0, 0, 0, 1,
                0, 1, 1, 1, 0,
            ],
            'I' => [
                1, 1, 1, 1, 1,
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
                1, 1, 1, 1, 1,
            ],
            'L' => [
                1, 0, 0, 0, 0,
                1, 0, 0, 0, 0,
                1, 0, 0, 0, 0,
                1, 0, 0, 0, 0,
                1, 1, 1, 1, 1,
            ],
            'O' => [
                0, 1, 1, 1, 0,
                1, 0, 0, 0, 1,
                1, 0, 0, 0, 1,
                1, 0, 0, 0, 1,
                0, 1, 1, 1, 0,
            ],
            'R' => [
                1, 1, 1, 1, 0,
                1, 0, 0, 0, 1,
                1, 1, 1, 1, 0,
                1, 0, 1, 0, 0,
                1, 0, 0, 1, 1,
            ],
            'S' => [
                1, 1, 1, 1, 1,
                1, 0, 0, 0, 0,
                1, 1, 1, 1, 1,
                0, 0, 0, 0, 1,
                1, 1, 1, 1, 1,
            ],
            '+' => [
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
                1, 1, 1, 1, 1,
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
            ],
            '-' => [
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                1, 1, 1, 1, 1,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
            ],
            '^' => [
                0, 0, 1, 0, 0,
                0, 1, 1, 1, 0,
                1, 0, 1, 0, 1,
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
            ],
            'v' => [
                0, 0, 1, 0, 0,
                0, 0, 1, 0, 0,
                1, 0, 1, 0, 1,
                0, 1, 1, 1, 0,
                0, 0, 1, 0, 0,
            ],
            '<' => [
                0, 0, 0, 1, 0,
                0, 0, 1, 0, 0,
                0, 1, 0, 0, 0,
                0, 0, 1, 0, 0,
                0, 0, 0, 1, 0,
            ],
            '>' => [
                0, 1, 0, 0, 0,
                0, 0, 1, 0, 0,
                0, 0, 0, 1, 0,
                0, 0, 1, 0, 0,
                0, 1, 0, 0, 0,
            ],
            _ => return None,
        };
        Some(Glyph(pattern))
    }

    /// Draws the glyph centered in `bounds`, each glyph cell `scale` pixels wide.
    pub fn draw_centered(&self, target: &mut dyn RenderTarget, bounds: Rect, scale: u32, color: Color) {
        let scale = scale.max(1);
        let extent = (Self::SIZE * scale) as i32;
        let origin = Vec2i::new(
            bounds.pos.x + (bounds.size.x as i32 - extent) / 2,
            bounds.pos.y + (bounds.size.y as i32 - extent) / 2,
        );
        for row in 0..Self::SIZE {
            for col in 0..Self::SIZE {
                if self.0[(row * Self::SIZE + col) as usize] == 1 {
                    target.fill_rect(
                        Rect::from_xywh(
                            origin.x + (col * scale) as i32,
                            origin.y + (row * scale) as i32,
                            scale,
                            scale,
                        ),
                        color,
                    );
                }
            }
        }
    }
}
