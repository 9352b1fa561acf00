//! Code generator: reproduces the renderer's calls as ImGui.NET (C#) statements.
//!
//! [`CodeWriter`] is a [`DrawSurface`]; generation runs the renderer's own
//! dispatch against it with [`Placement::RAW`]. Widgets never report changes.

use crate::element::{Element, ElementKind, binding_name};
use crate::error::SurfaceError;
use crate::render::{self, Placement};
use crate::surface::{ColorValue, DrawSurface, Font, StyleColor, StyleVar};
use egui::{Pos2, Vec2};

pub(crate) const HEADER: &str =
    "// ImGui code generated by imgui RAD Designer\n// Add this code to your ImGui render loop\n\n";

pub(crate) const EMPTY_PLACEHOLDER: &str =
    "// No elements defined\n// Use the designer to add elements\n";

/// Text sink that turns draw calls into statements, one per line.
pub(crate) struct CodeWriter<'a> {
    out: &'a mut String,
}

impl<'a> CodeWriter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        Self { out }
    }

    fn line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }
}

fn vector4(color: ColorValue) -> String {
    match color {
        ColorValue::Opaque(c) => format!(
            "new Vector4({}/255f, {}/255f, {}/255f, 1.0f)",
            c.r, c.g, c.b
        ),
        ColorValue::Transparent => "new Vector4(0, 0, 0, 0)".to_owned(),
    }
}

fn pop_args(count: usize) -> String {
    if count == 1 {
        String::new()
    } else {
        count.to_string()
    }
}

impl DrawSurface for CodeWriter<'_> {
    fn begin_frame(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn set_cursor_pos(&mut self, pos: Pos2) {
        self.line(&format!(
            "ImGui.SetCursorPos(new Vector2({}f, {}f));",
            pos.x, pos.y
        ));
    }

    fn push_style_color(&mut self, slot: StyleColor, color: ColorValue) {
        self.line(&format!(
            "ImGui.PushStyleColor({}, {});",
            slot.imgui_name(),
            vector4(color)
        ));
    }

    fn pop_style_color(&mut self, count: usize) {
        self.line(&format!("ImGui.PopStyleColor({});", pop_args(count)));
    }

    fn push_style_var(&mut self, var: StyleVar, value: Vec2) {
        self.line(&format!(
            "ImGui.PushStyleVar({}, new Vector2({}, {}));",
            var.imgui_name(),
            value.x,
            value.y
        ));
    }

    fn pop_style_var(&mut self, count: usize) {
        self.line(&format!("ImGui.PopStyleVar({});", pop_args(count)));
    }

    fn push_font(&mut self, font: Font) {
        match font {
            Font::Bold => self.line("ImGui.PushFont(ImGui.GetIO().Fonts.Fonts[0]);"),
        }
    }

    fn pop_font(&mut self) {
        self.line("ImGui.PopFont();");
    }

    fn button(&mut self, label: &str, size: Vec2) -> bool {
        self.line(&format!(
            "if (ImGui.Button(\"{label}\", new Vector2({}f, {}f)))",
            size.x, size.y
        ));
        self.line("{");
        self.line(&format!("    // Handle button click for: {label}"));
        self.line("}");
        false
    }

    fn text(&mut self, text: &str) {
        self.line(&format!("ImGui.Text(\"{text}\");"));
    }

    fn input_text(
        &mut self,
        label: &str,
        value: &mut String,
        max_length: usize,
        password: bool,
    ) -> bool {
        let var = binding_name(label, ElementKind::InputText.binding_fallback());
        self.line(&format!("string {var}Value = \"{value}\";"));
        let flags = if password {
            ", ImGuiInputTextFlags.Password"
        } else {
            ""
        };
        self.line(&format!(
            "ImGui.InputText(\"{label}\", ref {var}Value, {max_length}{flags});"
        ));
        false
    }

    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        let var = binding_name(label, ElementKind::Checkbox.binding_fallback());
        self.line(&format!("bool {var}Value = {checked};"));
        self.line(&format!("ImGui.Checkbox(\"{label}\", ref {var}Value);"));
        false
    }

    fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let var = binding_name(label, ElementKind::Slider.binding_fallback());
        self.line(&format!("float {var}Value = {value}f;"));
        self.line(&format!(
            "ImGui.SliderFloat(\"{label}\", ref {var}Value, {min}f, {max}f);"
        ));
        false
    }

    fn combo(&mut self, label: &str, current: &mut usize, items: &[String]) -> bool {
        let var = binding_name(label, ElementKind::ComboBox.binding_fallback());
        let quoted = items
            .iter()
            .map(|item| format!("\"{item}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(&format!("string[] {var}Items = {{ {quoted} }};"));
        self.line(&format!("int {var}Selected = {current};"));
        self.line(&format!(
            "ImGui.Combo(\"{label}\", ref {var}Selected, {var}Items, {});",
            items.len()
        ));
        false
    }

    fn end_frame(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn render(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// Regenerates the code text into `out`, reusing its allocation.
pub(crate) fn generate_into(out: &mut String, elements: &[Element]) {
    out.clear();
    out.push_str(HEADER);
    if elements.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        return;
    }
    let mut writer = CodeWriter::new(out);
    for element in elements {
        writer.line(&format!("// {}: {}", element.kind(), element.code_name()));
        render::draw_element(&mut writer, element, Placement::RAW);
        writer.line("");
    }
}
