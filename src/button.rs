use std::any::Any;

use crate::action::Action;
use crate::event::{Event, MouseButton};
use crate::geometry::{Color, Rect};
use crate::icons::Glyph;
use crate::render::RenderTarget;
use crate::window::{UpdateContext, Window, WindowBase, WindowId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Hover,
    Press,
    /// Toggled on. Kept until clicked again or reset by the parent.
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    /// Click switches between on (`Released`) and off.
    Toggle,
    /// Fires on every click and never stays on.
    Momentary,
}

/// Called with the state a click left the button in.
pub type ClickHandler = Box<dyn FnMut(ButtonState) -> Option<Box<dyn Action>>>;

pub struct Button {
    base: WindowBase,
    kind: ButtonKind,
    state: ButtonState,
    fill: Color,
    glyph: Option<Glyph>,
    on_click: Option<ClickHandler>,
}

impl Button {
    pub fn new(id: WindowId, rect: Rect, kind: ButtonKind) -> Self {
        Self {
            base: WindowBase::new(id, rect),
            kind,
            state: ButtonState::Normal,
            fill: Color::rgb(200, 200, 200),
            glyph: None,
            on_click: None,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_label(mut self, ch: char) -> Self {
        self.glyph = Glyph::for_char(ch);
        self
    }

    pub fn on_click(mut self, handler: impl FnMut(ButtonState) -> Option<Box<dyn Action>> + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Starts toggled on. Only meaningful for [`ButtonKind::Toggle`].
    pub fn toggled(mut self) -> Self {
        if self.kind == ButtonKind::Toggle {
            self.state = ButtonState::Released;
        }
        self
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    fn click(&mut self, ctx: &mut UpdateContext<'_>, next: ButtonState) {
        self.state = next;
        if let Some(handler) = self.on_click.as_mut() {
            if let Some(action) = handler(next) {
                ctx.emit(action);
            }
        }
    }
}

impl Window for Button {
    fn base(&self) -> &WindowBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WindowBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool {
        let hovered = ctx.is_hovered(self.base.rect);

        if event.is_press(MouseButton::Left) && hovered {
            if self.state != ButtonState::Released {
                self.state = ButtonState::Press;
            }
            return true;
        }

        if event.is_release(MouseButton::Left) {
            if !hovered {
                if self.state == ButtonState::Press {
                    self.state = ButtonState::Normal;
                }
                return false;
            }
            match (self.kind, self.state) {
                (ButtonKind::Toggle, ButtonState::Press) => self.click(ctx, ButtonState::Released),
                (ButtonKind::Toggle, ButtonState::Released) => self.click(ctx, ButtonState::Normal),
                (ButtonKind::Momentary, ButtonState::Press) => self.click(ctx, ButtonState::Hover),
                _ => self.state = ButtonState::Hover,
            }
            return true;
        }

        match self.state {
            ButtonState::Released => {}
            ButtonState::Press if hovered => {}
            _ => {
                self.state = if hovered { ButtonState::Hover } else { ButtonState::Normal };
            }
        }
        hovered
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        let rect = self.base.rect;
        let fill = match self.state {
            ButtonState::Normal => self.fill,
            ButtonState::Hover => self.fill.shade(25),
            ButtonState::Press => self.fill.shade(-40),
            ButtonState::Released => self.fill.shade(-20),
        };
        target.fill_rect(rect, fill);

        let border = if self.state == ButtonState::Released {
            Color::rgb(30, 90, 200)
        } else {
            Color::rgb(90, 90, 90)
        };
        let thickness = if self.state == ButtonState::Released { 2 } else { 1 };
        target.outline_rect(rect, border, thickness);

        if let Some(glyph) = self.glyph {
            let scale = (rect.size.y / (Glyph::SIZE + 4)).max(1);
            glyph.draw_centered(target, rect, scale, Color::rgb(30, 30, 30));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn is_released(&self) -> bool {
        self.state == ButtonState::Released
    }

    fn reset_state(&mut self) {
        if self.state == ButtonState::Released {
            self.state = ButtonState::Normal;
        }
    }
}
