//! [`DrawSurface`] on top of an `egui::Ui`.

use super::{ColorValue, DrawSurface, Font, StackCount, StyleColor, StyleVar};
use crate::element::fit_to_buffer;
use crate::error::SurfaceError;
use egui::{Color32, Pos2, Rect, RichText, UiBuilder, Vec2};

/// Draws widgets at absolute positions inside `ui`, emulating ImGui's style stacks.
pub(crate) struct EguiSurface<'a> {
    ui: &'a mut egui::Ui,
    origin: Pos2,
    cursor: Pos2,
    colors: Vec<(StyleColor, ColorValue)>,
    vars: Vec<(StyleVar, Vec2)>,
    fonts: Vec<Font>,
    color_count: StackCount,
    var_count: StackCount,
    font_count: StackCount,
    // widget sequence within the frame, used as id salt
    seq: usize,
}

/// Style in effect for the next widget.
#[derive(Default)]
struct ResolvedStyle {
    button: Option<Color32>,
    button_hovered: Option<Color32>,
    button_active: Option<Color32>,
    text: Option<Color32>,
    frame_padding: Option<Vec2>,
    bold: bool,
}

impl ResolvedStyle {
    fn apply(&self, ui: &mut egui::Ui) {
        if let Some(pad) = self.frame_padding {
            ui.spacing_mut().button_padding = pad;
        }
        let widgets = &mut ui.visuals_mut().widgets;
        if let Some(c) = self.button {
            widgets.inactive.weak_bg_fill = c;
            widgets.inactive.bg_fill = c;
        }
        if let Some(c) = self.button_hovered {
            widgets.hovered.weak_bg_fill = c;
            widgets.hovered.bg_fill = c;
        }
        if let Some(c) = self.button_active {
            widgets.active.weak_bg_fill = c;
            widgets.active.bg_fill = c;
        }
        if let Some(c) = self.text {
            ui.visuals_mut().override_text_color = Some(c);
        }
    }

    fn rich(&self, s: &str) -> RichText {
        let text = RichText::new(s);
        if self.bold { text.strong() } else { text }
    }
}

impl<'a> EguiSurface<'a> {
    /// `origin` is the screen position that cursor coordinates are relative to.
    pub fn new(ui: &'a mut egui::Ui, origin: Pos2) -> Self {
        Self {
            ui,
            origin,
            cursor: origin,
            colors: Vec::new(),
            vars: Vec::new(),
            fonts: Vec::new(),
            color_count: StackCount::default(),
            var_count: StackCount::default(),
            font_count: StackCount::default(),
            seq: 0,
        }
    }

    fn resolved(&self) -> ResolvedStyle {
        let mut style = ResolvedStyle::default();
        // later pushes win
        for (slot, color) in &self.colors {
            let c = Some(color.to_color32());
            match slot {
                StyleColor::Button => style.button = c,
                StyleColor::ButtonHovered => style.button_hovered = c,
                StyleColor::ButtonActive => style.button_active = c,
                StyleColor::Text => style.text = c,
            }
        }
        for (var, value) in &self.vars {
            match var {
                StyleVar::FramePadding => style.frame_padding = Some(*value),
            }
        }
        style.bold = self.fonts.contains(&Font::Bold);
        style
    }

    /// Runs `add` in a child ui anchored at the cursor with the current style applied.
    fn place<R>(
        &mut self,
        size: Option<Vec2>,
        add: impl FnOnce(&mut egui::Ui, &ResolvedStyle) -> R,
    ) -> R {
        self.seq += 1;
        let style = self.resolved();
        let remaining = (self.ui.max_rect().max - self.cursor).max(Vec2::ZERO);
        let rect = Rect::from_min_size(self.cursor, size.unwrap_or(remaining));
        let builder = UiBuilder::new()
            .id_salt(("element", self.seq))
            .max_rect(rect);
        self.ui
            .scope_builder(builder, |ui| {
                style.apply(ui);
                add(ui, &style)
            })
            .inner
    }

    fn reset(&mut self) {
        self.colors.clear();
        self.vars.clear();
        self.fonts.clear();
        self.color_count = StackCount::default();
        self.var_count = StackCount::default();
        self.font_count = StackCount::default();
        self.seq = 0;
        self.cursor = self.origin;
    }
}

fn pop_n<T>(stack: &mut Vec<T>, count: &mut StackCount, n: usize) {
    count.popped += n;
    let keep = stack.len().saturating_sub(n);
    stack.truncate(keep);
}

impl DrawSurface for EguiSurface<'_> {
    fn begin_frame(&mut self) -> Result<(), SurfaceError> {
        self.reset();
        Ok(())
    }

    fn set_cursor_pos(&mut self, pos: Pos2) {
        self.cursor = self.origin + pos.to_vec2();
    }

    fn push_style_color(&mut self, slot: StyleColor, color: ColorValue) {
        self.color_count.pushed += 1;
        self.colors.push((slot, color));
    }

    fn pop_style_color(&mut self, count: usize) {
        pop_n(&mut self.colors, &mut self.color_count, count);
    }

    fn push_style_var(&mut self, var: StyleVar, value: Vec2) {
        self.var_count.pushed += 1;
        self.vars.push((var, value));
    }

    fn pop_style_var(&mut self, count: usize) {
        pop_n(&mut self.vars, &mut self.var_count, count);
    }

    fn push_font(&mut self, font: Font) {
        self.font_count.pushed += 1;
        self.fonts.push(font);
    }

    fn pop_font(&mut self) {
        pop_n(&mut self.fonts, &mut self.font_count, 1);
    }

    fn button(&mut self, label: &str, size: Vec2) -> bool {
        let sized = size.x > 0.0 && size.y > 0.0;
        self.place(sized.then_some(size), |ui, style| {
            let button = egui::Button::new(style.rich(label));
            let response = if sized {
                ui.add_sized(size, button)
            } else {
                ui.add(button)
            };
            response.clicked()
        })
    }

    fn text(&mut self, text: &str) {
        self.place(None, |ui, style| {
            ui.add(egui::Label::new(style.rich(text)).wrap_mode(egui::TextWrapMode::Extend));
        });
    }

    fn input_text(
        &mut self,
        label: &str,
        value: &mut String,
        max_length: usize,
        password: bool,
    ) -> bool {
        let changed = self.place(None, |ui, style| {
            ui.horizontal(|ui| {
                let edit = egui::TextEdit::singleline(&mut *value)
                    .password(password)
                    .char_limit(max_length.saturating_sub(1));
                let changed = ui.add(edit).changed();
                ui.label(style.rich(label));
                changed
            })
            .inner
        });
        if changed {
            // char_limit counts chars, the buffer counts bytes
            let fitted = fit_to_buffer(value, max_length).len();
            value.truncate(fitted);
        }
        changed
    }

    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        self.place(None, |ui, style| {
            ui.checkbox(checked, style.rich(label)).changed()
        })
    }

    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        self.place(None, |ui, style| {
            ui.add(egui::Slider::new(value, min..=max).text(style.rich(label)))
                .changed()
        })
    }

    fn combo(&mut self, label: &str, current: &mut usize, items: &[String]) -> bool {
        let seq = self.seq + 1;
        let before = *current;
        self.place(None, |ui, style| {
            let selected_text = items.get(*current).cloned().unwrap_or_default();
            egui::ComboBox::new(("combo", seq), style.rich(label))
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (i, item) in items.iter().enumerate() {
                        ui.selectable_value(&mut *current, i, item.as_str());
                    }
                });
        });
        *current != before
    }

    fn end_frame(&mut self) -> Result<(), SurfaceError> {
        let result = self
            .color_count
            .check("style color")
            .and_then(|_| self.var_count.check("style var"))
            .and_then(|_| self.font_count.check("font"));
        self.reset();
        result
    }

    fn render(&mut self) -> Result<(), SurfaceError> {
        // egui paints the frame after `update` returns
        Ok(())
    }
}
