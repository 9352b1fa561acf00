//! The immediate-mode drawing surface both projections are written against.
//!
//! A frame is `begin_frame`, any number of cursor moves, style pushes and
//! widget calls, then `end_frame` and `render`. Widget calls report whether the
//! user changed the bound value during this frame.

mod egui_surface;
#[cfg(test)]
pub(crate) mod recording;

pub(crate) use egui_surface::EguiSurface;

use crate::element::Rgb;
use crate::error::SurfaceError;
use egui::{Color32, Pos2, Vec2};

/// Style color slots the designer touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum StyleColor {
    Button,
    ButtonHovered,
    ButtonActive,
    Text,
}

impl StyleColor {
    /// ImGui.NET enum member name.
    pub const fn imgui_name(&self) -> &'static str {
        match self {
            StyleColor::Button => "ImGuiCol.Button",
            StyleColor::ButtonHovered => "ImGuiCol.ButtonHovered",
            StyleColor::ButtonActive => "ImGuiCol.ButtonActive",
            StyleColor::Text => "ImGuiCol.Text",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum StyleVar {
    FramePadding,
}

impl StyleVar {
    pub const fn imgui_name(&self) -> &'static str {
        match self {
            StyleVar::FramePadding => "ImGuiStyleVar.FramePadding",
        }
    }
}

/// Fonts that can be pushed. `Bold` is the first font in the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Font {
    Bold,
}

/// A pushed color. Channels stay as 8-bit values until a backend needs floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ColorValue {
    Opaque(Rgb),
    Transparent,
}

impl ColorValue {
    /// Channel-wise `c / 255` with alpha 1.0, or all zeroes.
    pub fn to_vec4(self) -> [f32; 4] {
        match self {
            ColorValue::Opaque(c) => [
                c.r as f32 / 255.0,
                c.g as f32 / 255.0,
                c.b as f32 / 255.0,
                1.0,
            ],
            ColorValue::Transparent => [0.0; 4],
        }
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b, a] = self.to_vec4().map(|c| (c * 255.0).round() as u8);
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

pub(crate) trait DrawSurface {
    fn begin_frame(&mut self) -> Result<(), SurfaceError>;

    /// Positions the next widget, relative to the surface origin.
    fn set_cursor_pos(&mut self, pos: Pos2);

    fn push_style_color(&mut self, slot: StyleColor, color: ColorValue);
    fn pop_style_color(&mut self, count: usize);
    fn push_style_var(&mut self, var: StyleVar, value: Vec2);
    fn pop_style_var(&mut self, count: usize);
    fn push_font(&mut self, font: Font);
    fn pop_font(&mut self);

    /// Returns true when the button was activated this frame.
    fn button(&mut self, label: &str, size: Vec2) -> bool;
    fn text(&mut self, text: &str);
    fn input_text(
        &mut self,
        label: &str,
        value: &mut String,
        max_length: usize,
        password: bool,
    ) -> bool;
    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool;
    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool;
    fn combo(&mut self, label: &str, current: &mut usize, items: &[String]) -> bool;

    fn end_frame(&mut self) -> Result<(), SurfaceError>;
    fn render(&mut self) -> Result<(), SurfaceError>;
}

/// Push/pop bookkeeping shared by surfaces that verify balance at end of frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StackCount {
    pub(crate) pushed: usize,
    pub(crate) popped: usize,
}

impl StackCount {
    pub fn check(&self, what: &'static str) -> Result<(), SurfaceError> {
        if self.pushed == self.popped {
            Ok(())
        } else {
            Err(SurfaceError::Unbalanced {
                what,
                pushed: self.pushed,
                popped: self.popped,
            })
        }
    }
}
