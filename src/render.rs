//! Renderer adapter: element list → draw calls on a [`DrawSurface`].
//!
//! The code generator drives the same functions with a text-emitting surface,
//! so every branch taken here shows up verbatim in the generated code.

use crate::element::{ButtonStyle, Element, ElementProps, PropertyChange, fit_to_buffer};
use crate::error::SurfaceError;
use crate::surface::{ColorValue, DrawSurface, Font, StyleColor, StyleVar};
use egui::{Pos2, Vec2, pos2, vec2};

/// Design surface the preview scale is computed against. Independent of the real canvas size.
pub(crate) const REFERENCE_SIZE: Vec2 = vec2(800.0, 400.0);

/// Margin between a preview's origin and element position (0, 0).
pub(crate) const ORIGIN_MARGIN: Vec2 = vec2(10.0, 30.0);

/// Used when a preview target reports no area.
pub(crate) const FALLBACK_TARGET: Vec2 = vec2(400.0, 300.0);

/// How stored element geometry maps onto a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) offset: Vec2,
    pub(crate) scale: f32,
}

impl Placement {
    /// Stored coordinates unchanged; what generated code uses.
    pub(crate) const RAW: Placement = Placement {
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    /// The design-time preview window.
    pub(crate) const DESIGN: Placement = Placement {
        offset: ORIGIN_MARGIN,
        scale: 1.0,
    };

    /// Embedded preview fitted into `target`.
    pub fn scaled(target: Vec2) -> Self {
        Self {
            offset: ORIGIN_MARGIN,
            scale: preview_scale(target),
        }
    }

    pub fn cursor(&self, pos: Pos2) -> Pos2 {
        pos2(
            pos.x * self.scale + self.offset.x,
            pos.y * self.scale + self.offset.y,
        )
    }

    pub fn size(&self, size: Vec2) -> Vec2 {
        size * self.scale
    }
}

/// Uniform scale that fits the reference design surface into `target`.
pub(crate) fn preview_scale(target: Vec2) -> f32 {
    let target = if target.x <= 0.0 || target.y <= 0.0 {
        FALLBACK_TARGET
    } else {
        target
    };
    (target.x / REFERENCE_SIZE.x).min(target.y / REFERENCE_SIZE.y)
}

/// What the user did to one element during a frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Interaction {
    Activated,
    Edited(PropertyChange),
}

/// Interactions collected over a frame, by element index.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FrameReport {
    pub(crate) edits: Vec<(usize, PropertyChange)>,
    pub(crate) activated: Vec<usize>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.activated.is_empty()
    }
}

/// Draws one element. Pushes and pops are always balanced.
pub(crate) fn draw_element<S: DrawSurface + ?Sized>(
    surface: &mut S,
    element: &Element,
    placement: Placement,
) -> Option<Interaction> {
    surface.set_cursor_pos(placement.cursor(element.pos));

    match &element.props {
        ElementProps::Button(p) => {
            let padding = p.style.frame_padding();
            if let Some(pad) = padding {
                surface.push_style_var(StyleVar::FramePadding, pad);
            }
            let pushed = if p.style == ButtonStyle::Invisible {
                surface.push_style_color(StyleColor::Button, ColorValue::Transparent);
                surface.push_style_color(StyleColor::ButtonHovered, ColorValue::Transparent);
                surface.push_style_color(StyleColor::ButtonActive, ColorValue::Transparent);
                3
            } else {
                surface.push_style_color(
                    StyleColor::Button,
                    ColorValue::Opaque(p.background_color),
                );
                surface.push_style_color(StyleColor::Text, ColorValue::Opaque(p.text_color));
                2
            };
            let activated = surface.button(&p.text, placement.size(p.size));
            surface.pop_style_color(pushed);
            if padding.is_some() {
                surface.pop_style_var(1);
            }
            activated.then_some(Interaction::Activated)
        }
        ElementProps::Text(p) => {
            if p.is_bold {
                surface.push_font(Font::Bold);
            }
            surface.push_style_color(StyleColor::Text, ColorValue::Opaque(p.text_color));
            surface.text(&p.text);
            surface.pop_style_color(1);
            if p.is_bold {
                surface.pop_font();
            }
            None
        }
        ElementProps::InputText(p) => {
            let mut buf = fit_to_buffer(&p.value, p.max_length).to_owned();
            surface
                .input_text(&p.label, &mut buf, p.max_length, p.is_password)
                .then(|| Interaction::Edited(PropertyChange::InputValue(buf)))
        }
        ElementProps::Checkbox(p) => {
            let mut checked = p.is_checked;
            surface
                .checkbox(&p.label, &mut checked)
                .then_some(Interaction::Edited(PropertyChange::Checked(checked)))
        }
        ElementProps::Slider(p) => {
            let mut value = p.value;
            surface
                .slider_float(&p.label, &mut value, p.min_value, p.max_value)
                .then_some(Interaction::Edited(PropertyChange::SliderValue(value)))
        }
        ElementProps::ComboBox(p) => {
            if p.items.is_empty() {
                return None;
            }
            let mut selected = p.selected_index;
            surface
                .combo(&p.label, &mut selected, &p.items)
                .then_some(Interaction::Edited(PropertyChange::SelectedIndex(selected)))
        }
    }
}

/// Draws every element in collection order (later elements paint over earlier ones).
pub(crate) fn draw_elements<S: DrawSurface + ?Sized>(
    surface: &mut S,
    elements: &[Element],
    placement: Placement,
) -> FrameReport {
    let mut report = FrameReport::default();
    for (i, element) in elements.iter().enumerate() {
        match draw_element(surface, element, placement) {
            Some(Interaction::Activated) => report.activated.push(i),
            Some(Interaction::Edited(change)) => report.edits.push((i, change)),
            None => {}
        }
    }
    report
}

/// One complete frame: begin, draw, end, render.
pub(crate) fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    elements: &[Element],
    placement: Placement,
) -> Result<FrameReport, SurfaceError> {
    surface.begin_frame()?;
    let report = draw_elements(surface, elements, placement);
    surface.end_frame()?;
    surface.render()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Rgb};
    use crate::surface::recording::{DrawCall, RecordingSurface, Scripted};

    fn button(style: ButtonStyle) -> Element {
        let mut e = Element::new(ElementKind::Button, pos2(10.0, 10.0));
        e.apply(PropertyChange::Text("OK".into())).unwrap();
        e.apply(PropertyChange::Size(vec2(80.0, 24.0))).unwrap();
        e.apply(PropertyChange::Style(style)).unwrap();
        e
    }

    #[test]
    fn test_default_button_call_sequence() {
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &button(ButtonStyle::Default), Placement::RAW);
        assert_eq!(
            s.calls,
            vec![
                DrawCall::SetCursorPos(pos2(10.0, 10.0)),
                DrawCall::PushStyleColor(StyleColor::Button, ColorValue::Opaque(Rgb::GREEN)),
                DrawCall::PushStyleColor(StyleColor::Text, ColorValue::Opaque(Rgb::WHITE)),
                DrawCall::Button {
                    label: "OK".into(),
                    size: vec2(80.0, 24.0)
                },
                DrawCall::PopStyleColor(2),
            ]
        );
    }

    #[test]
    fn test_invisible_button_pushes_three_transparent_colors() {
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &button(ButtonStyle::Invisible), Placement::RAW);
        assert_eq!(
            s.count(|c| matches!(c, DrawCall::PushStyleColor(_, ColorValue::Transparent))),
            3
        );
        assert!(s.calls.contains(&DrawCall::PopStyleColor(3)));
        assert_eq!(s.count(|c| matches!(c, DrawCall::PushStyleVar(..))), 0);
        assert_eq!(s.count(|c| matches!(c, DrawCall::PopStyleVar(_))), 0);
    }

    #[test]
    fn test_sized_styles_push_frame_padding() {
        for (style, pad) in [
            (ButtonStyle::Small, vec2(4.0, 2.0)),
            (ButtonStyle::Large, vec2(12.0, 8.0)),
        ] {
            let mut s = RecordingSurface::new();
            draw_element(&mut s, &button(style), Placement::RAW);
            assert_eq!(
                s.calls[1],
                DrawCall::PushStyleVar(StyleVar::FramePadding, pad)
            );
            assert_eq!(s.calls.last(), Some(&DrawCall::PopStyleVar(1)));
        }
    }

    #[test]
    fn test_every_button_style_renders_balanced_frame() {
        for style in ButtonStyle::ALL {
            let mut s = RecordingSurface::new();
            let elements = vec![button(style)];
            assert!(render_frame(&mut s, &elements, Placement::DESIGN).is_ok(), "{style:?}");
        }
    }

    #[test]
    fn test_bold_text_wraps_font() {
        let mut e = Element::new(ElementKind::Text, pos2(0.0, 0.0));
        e.apply(PropertyChange::Bold(true)).unwrap();
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &e, Placement::RAW);
        assert_eq!(s.calls[1], DrawCall::PushFont(Font::Bold));
        assert_eq!(s.calls.last(), Some(&DrawCall::PopFont));
        assert_eq!(s.count(|c| matches!(c, DrawCall::PopStyleColor(1))), 1);

        e.apply(PropertyChange::Bold(false)).unwrap();
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &e, Placement::RAW);
        assert_eq!(s.count(|c| matches!(c, DrawCall::PushFont(_) | DrawCall::PopFont)), 0);
    }

    #[test]
    fn test_empty_combo_draws_nothing() {
        let mut e = Element::new(ElementKind::ComboBox, pos2(0.0, 0.0));
        e.apply(PropertyChange::Items(Vec::new())).unwrap();
        e.apply(PropertyChange::SelectedIndex(3)).unwrap();
        let mut s = RecordingSurface::new();
        let report = render_frame(&mut s, &[e], Placement::DESIGN).unwrap();
        assert!(report.is_empty());
        assert_eq!(s.count(|c| matches!(c, DrawCall::Combo { .. })), 0);
    }

    #[test]
    fn test_input_buffer_is_truncated_not_rejected() {
        let mut e = Element::new(ElementKind::InputText, pos2(0.0, 0.0));
        e.apply(PropertyChange::InputValue("hello".into())).unwrap();
        e.apply(PropertyChange::MaxLength(4)).unwrap();
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &e, Placement::RAW);
        assert!(s.calls.contains(&DrawCall::InputText {
            label: "Input".into(),
            value: "hel".into(),
            max_length: 4,
            password: false,
        }));
    }

    #[test]
    fn test_widget_edits_are_reported_for_write_back() {
        let elements = vec![
            Element::new(ElementKind::Checkbox, pos2(0.0, 0.0)),
            Element::new(ElementKind::Slider, pos2(0.0, 40.0)),
            Element::new(ElementKind::ComboBox, pos2(0.0, 80.0)),
            Element::new(ElementKind::InputText, pos2(0.0, 120.0)),
            Element::new(ElementKind::Button, pos2(0.0, 160.0)),
        ];
        let mut s = RecordingSurface::new()
            .script("Checkbox", Scripted::Check(true))
            .script("Slider", Scripted::Slide(0.25))
            .script("Combo", Scripted::Select(2))
            .script("Input", Scripted::Type("abc".into()))
            .script("Button", Scripted::Press);
        let report = render_frame(&mut s, &elements, Placement::DESIGN).unwrap();
        assert_eq!(
            report.edits,
            vec![
                (0, PropertyChange::Checked(true)),
                (1, PropertyChange::SliderValue(0.25)),
                (2, PropertyChange::SelectedIndex(2)),
                (3, PropertyChange::InputValue("abc".into())),
            ]
        );
        assert_eq!(report.activated, vec![4]);
    }

    #[test]
    fn test_design_placement_offsets_by_margin() {
        let mut s = RecordingSurface::new();
        draw_element(&mut s, &button(ButtonStyle::Default), Placement::DESIGN);
        assert_eq!(s.calls[0], DrawCall::SetCursorPos(pos2(20.0, 40.0)));
    }

    #[test]
    fn test_scaled_placement_scales_position_then_offsets() {
        let placement = Placement::scaled(vec2(400.0, 300.0));
        assert_eq!(placement.scale, 0.5);
        let mut s = RecordingSurface::new();
        let mut e = button(ButtonStyle::Default);
        e.apply(PropertyChange::Position(pos2(100.0, 100.0))).unwrap();
        draw_element(&mut s, &e, placement);
        assert_eq!(s.calls[0], DrawCall::SetCursorPos(pos2(60.0, 80.0)));
        assert!(s.calls.contains(&DrawCall::Button {
            label: "OK".into(),
            size: vec2(40.0, 12.0)
        }));
    }

    #[test]
    fn test_preview_scale_picks_smaller_axis() {
        assert_eq!(preview_scale(vec2(1600.0, 400.0)), 1.0);
        assert_eq!(preview_scale(vec2(800.0, 800.0)), 1.0);
        assert_eq!(preview_scale(vec2(400.0, 400.0)), 0.5);
        // no area: fall back to 400x300
        assert_eq!(preview_scale(vec2(0.0, 0.0)), 0.5);
    }

    #[test]
    fn test_failed_begin_frame_propagates() {
        let mut s = RecordingSurface::new();
        s.fail_frames(1);
        assert!(render_frame(&mut s, &[], Placement::DESIGN).is_err());
        assert!(render_frame(&mut s, &[], Placement::DESIGN).is_ok());
    }
}
