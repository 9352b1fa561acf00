//! Headless surface that records every call, for tests.

use super::{ColorValue, DrawSurface, Font, StackCount, StyleColor, StyleVar};
use crate::error::SurfaceError;
use egui::{Pos2, Vec2};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCall {
    BeginFrame,
    SetCursorPos(Pos2),
    PushStyleColor(StyleColor, ColorValue),
    PopStyleColor(usize),
    PushStyleVar(StyleVar, Vec2),
    PopStyleVar(usize),
    PushFont(Font),
    PopFont,
    Button { label: String, size: Vec2 },
    Text(String),
    InputText {
        label: String,
        value: String,
        max_length: usize,
        password: bool,
    },
    Checkbox { label: String, checked: bool },
    SliderFloat {
        label: String,
        value: f32,
        min: f32,
        max: f32,
    },
    Combo {
        label: String,
        current: usize,
        items: Vec<String>,
    },
    EndFrame,
    Render,
}

/// A scripted user action, consumed by the first widget with a matching label.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Scripted {
    Press,
    Type(String),
    Check(bool),
    Slide(f32),
    Select(usize),
}

#[derive(Default)]
pub(crate) struct RecordingSurface {
    pub(crate) calls: Vec<DrawCall>,
    scripted: HashMap<String, Scripted>,
    failing_frames: usize,
    colors: StackCount,
    vars: StackCount,
    fonts: StackCount,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, label: &str, action: Scripted) -> Self {
        self.scripted.insert(label.to_owned(), action);
        self
    }

    /// Makes the next `n` frames fail in `begin_frame`.
    pub fn fail_frames(&mut self, n: usize) {
        self.failing_frames = n;
    }

    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn take(&mut self, label: &str) -> Option<Scripted> {
        self.scripted.remove(label)
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_frame(&mut self) -> Result<(), SurfaceError> {
        if self.failing_frames > 0 {
            self.failing_frames -= 1;
            return Err(SurfaceError::Backend("device lost".into()));
        }
        self.colors = StackCount::default();
        self.vars = StackCount::default();
        self.fonts = StackCount::default();
        self.calls.push(DrawCall::BeginFrame);
        Ok(())
    }

    fn set_cursor_pos(&mut self, pos: Pos2) {
        self.calls.push(DrawCall::SetCursorPos(pos));
    }

    fn push_style_color(&mut self, slot: StyleColor, color: ColorValue) {
        self.colors.pushed += 1;
        self.calls.push(DrawCall::PushStyleColor(slot, color));
    }

    fn pop_style_color(&mut self, count: usize) {
        self.colors.popped += count;
        self.calls.push(DrawCall::PopStyleColor(count));
    }

    fn push_style_var(&mut self, var: StyleVar, value: Vec2) {
        self.vars.pushed += 1;
        self.calls.push(DrawCall::PushStyleVar(var, value));
    }

    fn pop_style_var(&mut self, count: usize) {
        self.vars.popped += count;
        self.calls.push(DrawCall::PopStyleVar(count));
    }

    fn push_font(&mut self, font: Font) {
        self.fonts.pushed += 1;
        self.calls.push(DrawCall::PushFont(font));
    }

    fn pop_font(&mut self) {
        self.fonts.popped += 1;
        self.calls.push(DrawCall::PopFont);
    }

    fn button(&mut self, label: &str, size: Vec2) -> bool {
        self.calls.push(DrawCall::Button {
            label: label.to_owned(),
            size,
        });
        matches!(self.take(label), Some(Scripted::Press))
    }

    fn text(&mut self, text: &str) {
        self.calls.push(DrawCall::Text(text.to_owned()));
    }

    fn input_text(
        &mut self,
        label: &str,
        value: &mut String,
        max_length: usize,
        password: bool,
    ) -> bool {
        self.calls.push(DrawCall::InputText {
            label: label.to_owned(),
            value: value.clone(),
            max_length,
            password,
        });
        match self.take(label) {
            Some(Scripted::Type(s)) => {
                *value = s;
                true
            }
            _ => false,
        }
    }

    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        self.calls.push(DrawCall::Checkbox {
            label: label.to_owned(),
            checked: *checked,
        });
        match self.take(label) {
            Some(Scripted::Check(on)) => {
                *checked = on;
                true
            }
            _ => false,
        }
    }

    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        self.calls.push(DrawCall::SliderFloat {
            label: label.to_owned(),
            value: *value,
            min,
            max,
        });
        match self.take(label) {
            Some(Scripted::Slide(v)) => {
                *value = v;
                true
            }
            _ => false,
        }
    }

    fn combo(&mut self, label: &str, current: &mut usize, items: &[String]) -> bool {
        self.calls.push(DrawCall::Combo {
            label: label.to_owned(),
            current: *current,
            items: items.to_vec(),
        });
        match self.take(label) {
            Some(Scripted::Select(i)) => {
                *current = i;
                true
            }
            _ => false,
        }
    }

    fn end_frame(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::EndFrame);
        self.colors.check("style color")?;
        self.vars.check("style var")?;
        self.fonts.check("font")
    }

    fn render(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::Render);
        Ok(())
    }
}
