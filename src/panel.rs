//! Property panel: edits a draft element and reports each edit as a [`PropertyChange`].
//!
//! With nothing selected the draft is what "Add" inserts. With an element
//! selected the draft mirrors it and the app forwards every change to the design.

use crate::element::{
    ButtonStyle, DEFAULT_POSITION, Element, ElementKind, ElementProps, PropertyChange, Rgb,
};
use egui::{pos2, vec2};
use std::str::FromStr;
use tracing::debug;

/// Keeps only characters a number can contain: digits, `-` and `.`.
pub(crate) fn filter_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect()
}

/// A text box holding a number. Text that does not parse is kept on screen
/// but never reaches the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NumericField {
    text: String,
}

impl NumericField {
    pub fn set(&mut self, value: impl ToString) {
        self.text = value.to_string();
    }

    pub fn input(&mut self, text: &str) {
        self.text = filter_numeric(text);
    }

    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.text.trim().parse().ok()
    }

    /// Like `parse`, but digit runs beyond the f32 range count as unparsable.
    pub fn parse_f32(&self) -> Option<f32> {
        self.parse::<f32>().filter(|v| v.is_finite())
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut buf = self.text.clone();
        let changed = ui
            .add(egui::TextEdit::singleline(&mut buf).desired_width(70.0))
            .changed();
        if changed {
            self.input(&buf);
        }
        changed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NumericKey {
    X,
    Y,
    Width,
    Height,
    FontSize,
    Value,
    Min,
    Max,
    MaxLength,
    SelectedIndex,
}

#[derive(Clone, Debug, Default)]
struct NumericFields {
    x: NumericField,
    y: NumericField,
    width: NumericField,
    height: NumericField,
    font_size: NumericField,
    value: NumericField,
    min: NumericField,
    max: NumericField,
    max_length: NumericField,
    selected_index: NumericField,
}

impl NumericFields {
    fn get(&self, key: NumericKey) -> &NumericField {
        match key {
            NumericKey::X => &self.x,
            NumericKey::Y => &self.y,
            NumericKey::Width => &self.width,
            NumericKey::Height => &self.height,
            NumericKey::FontSize => &self.font_size,
            NumericKey::Value => &self.value,
            NumericKey::Min => &self.min,
            NumericKey::Max => &self.max,
            NumericKey::MaxLength => &self.max_length,
            NumericKey::SelectedIndex => &self.selected_index,
        }
    }

    fn get_mut(&mut self, key: NumericKey) -> &mut NumericField {
        match key {
            NumericKey::X => &mut self.x,
            NumericKey::Y => &mut self.y,
            NumericKey::Width => &mut self.width,
            NumericKey::Height => &mut self.height,
            NumericKey::FontSize => &mut self.font_size,
            NumericKey::Value => &mut self.value,
            NumericKey::Min => &mut self.min,
            NumericKey::Max => &mut self.max,
            NumericKey::MaxLength => &mut self.max_length,
            NumericKey::SelectedIndex => &mut self.selected_index,
        }
    }
}

/// One user edit collected while drawing, applied after the grid closes.
enum PanelEdit {
    Set(PropertyChange),
    Numeric(NumericKey),
}

pub(crate) struct PropertyPanel {
    draft: Element,
    fields: NumericFields,
    items_text: String,
}

impl Default for PropertyPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// One item per line; blank lines are dropped.
pub(crate) fn parse_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

impl PropertyPanel {
    pub fn new() -> Self {
        let mut panel = Self {
            draft: Element::new(ElementKind::Button, DEFAULT_POSITION),
            fields: NumericFields::default(),
            items_text: String::new(),
        };
        panel.sync();
        panel
    }

    /// The element "Add" would insert.
    pub fn new_element(&self) -> Element {
        self.draft.clone()
    }

    /// Mirrors `element` into the panel.
    pub fn load(&mut self, element: &Element) {
        self.draft = element.clone();
        self.sync();
    }

    /// Back to the startup values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Tracks a selection change: loads the new element, or clears the panel.
    pub fn follow(&mut self, selected: Option<&Element>) {
        match selected {
            Some(element) => self.load(element),
            None => self.reset(),
        }
    }

    /// Switches the draft to `kind`'s defaults, keeping id and position.
    pub fn set_kind(&mut self, kind: ElementKind) {
        if self.draft.kind() == kind {
            return;
        }
        let mut draft = Element::new(kind, self.draft.pos);
        draft.id = self.draft.id.take();
        self.draft = draft;
        self.sync();
    }

    /// Applies `change` to the draft; returns it if the draft's kind has that property.
    pub fn apply(&mut self, change: PropertyChange) -> Option<PropertyChange> {
        match self.draft.apply(change.clone()) {
            Ok(_) => {
                if let PropertyChange::Position(_) = change {
                    self.sync_position();
                }
                Some(change)
            }
            Err(err) => {
                debug!(%err, "panel edit ignored");
                None
            }
        }
    }

    /// Parses the field and turns it into a change. Unparsable text changes nothing.
    pub fn commit(&mut self, key: NumericKey) -> Option<PropertyChange> {
        let field = self.fields.get(key);
        let pos = self.draft.pos;
        let size = self.draft.size();
        let change = match key {
            NumericKey::X => PropertyChange::Position(pos2(field.parse_f32()?, pos.y)),
            NumericKey::Y => PropertyChange::Position(pos2(pos.x, field.parse_f32()?)),
            NumericKey::Width => PropertyChange::Size(vec2(field.parse_f32()?, size?.y)),
            NumericKey::Height => PropertyChange::Size(vec2(size?.x, field.parse_f32()?)),
            NumericKey::FontSize => PropertyChange::FontSize(field.parse_f32()?),
            NumericKey::Value => PropertyChange::SliderValue(field.parse_f32()?),
            NumericKey::Min => PropertyChange::MinValue(field.parse_f32()?),
            NumericKey::Max => PropertyChange::MaxValue(field.parse_f32()?),
            NumericKey::MaxLength => {
                PropertyChange::MaxLength(field.parse::<usize>().filter(|n| *n >= 1)?)
            }
            NumericKey::SelectedIndex => PropertyChange::SelectedIndex(field.parse()?),
        };
        self.apply(change)
    }

    /// Re-reads the position from the draft after a drag moved it.
    pub fn set_position(&mut self, pos: egui::Pos2) {
        self.draft.pos = pos;
        self.sync_position();
    }

    fn sync_position(&mut self) {
        self.fields.x.set(self.draft.pos.x);
        self.fields.y.set(self.draft.pos.y);
    }

    fn sync(&mut self) {
        self.sync_position();
        if let Some(size) = self.draft.size() {
            self.fields.width.set(size.x);
            self.fields.height.set(size.y);
        }
        match &self.draft.props {
            ElementProps::Text(p) => self.fields.font_size.set(p.font_size),
            ElementProps::InputText(p) => self.fields.max_length.set(p.max_length),
            ElementProps::Slider(p) => {
                self.fields.value.set(p.value);
                self.fields.min.set(p.min_value);
                self.fields.max.set(p.max_value);
            }
            ElementProps::ComboBox(p) => {
                self.fields.selected_index.set(p.selected_index);
                self.items_text = p.items.join("\n");
            }
            ElementProps::Button(_) | ElementProps::Checkbox(_) => {}
        }
    }

    /// Draws the panel. `bound` means an element is selected; the kind is then fixed.
    pub fn ui(&mut self, ui: &mut egui::Ui, bound: bool) -> Vec<PropertyChange> {
        let mut edits = Vec::new();
        let mut kind = self.draft.kind();
        let props = self.draft.props.clone();

        egui::Grid::new("property_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Type");
                ui.add_enabled_ui(!bound, |ui| {
                    egui::ComboBox::from_id_salt("element_kind")
                        .selected_text(kind.display_name())
                        .show_ui(ui, |ui| {
                            for k in ElementKind::ALL {
                                ui.selectable_value(&mut kind, k, k.display_name());
                            }
                        });
                });
                ui.end_row();

                let mut id = self.draft.id.clone().unwrap_or_default();
                if text_row(ui, "Id", &mut id) {
                    let id = (!id.trim().is_empty()).then_some(id);
                    edits.push(PanelEdit::Set(PropertyChange::Id(id)));
                }

                numeric_row(ui, "X", &mut self.fields, NumericKey::X, &mut edits);
                numeric_row(ui, "Y", &mut self.fields, NumericKey::Y, &mut edits);
                if self.draft.size().is_some() {
                    numeric_row(ui, "Width", &mut self.fields, NumericKey::Width, &mut edits);
                    numeric_row(ui, "Height", &mut self.fields, NumericKey::Height, &mut edits);
                }

                match props {
                    ElementProps::Button(mut p) => {
                        if text_row(ui, "Text", &mut p.text) {
                            edits.push(PanelEdit::Set(PropertyChange::Text(p.text)));
                        }
                        ui.label("Style");
                        let before = p.style;
                        egui::ComboBox::from_id_salt("button_style")
                            .selected_text(format!("{:?}", p.style))
                            .show_ui(ui, |ui| {
                                for style in ButtonStyle::ALL {
                                    ui.selectable_value(&mut p.style, style, format!("{style:?}"));
                                }
                            });
                        ui.end_row();
                        if p.style != before {
                            edits.push(PanelEdit::Set(PropertyChange::Style(p.style)));
                        }
                        if let Some(c) = color_row(ui, "Background", p.background_color) {
                            edits.push(PanelEdit::Set(PropertyChange::BackgroundColor(c)));
                        }
                        if let Some(c) = color_row(ui, "Text color", p.text_color) {
                            edits.push(PanelEdit::Set(PropertyChange::TextColor(c)));
                        }
                    }
                    ElementProps::Text(mut p) => {
                        if text_row(ui, "Text", &mut p.text) {
                            edits.push(PanelEdit::Set(PropertyChange::Text(p.text)));
                        }
                        if let Some(c) = color_row(ui, "Color", p.text_color) {
                            edits.push(PanelEdit::Set(PropertyChange::TextColor(c)));
                        }
                        numeric_row(ui, "Font size", &mut self.fields, NumericKey::FontSize, &mut edits);
                        if check_row(ui, "Bold", &mut p.is_bold) {
                            edits.push(PanelEdit::Set(PropertyChange::Bold(p.is_bold)));
                        }
                    }
                    ElementProps::InputText(mut p) => {
                        if text_row(ui, "Label", &mut p.label) {
                            edits.push(PanelEdit::Set(PropertyChange::Label(p.label)));
                        }
                        if text_row(ui, "Value", &mut p.value) {
                            edits.push(PanelEdit::Set(PropertyChange::InputValue(p.value)));
                        }
                        numeric_row(ui, "Max length", &mut self.fields, NumericKey::MaxLength, &mut edits);
                        if check_row(ui, "Password", &mut p.is_password) {
                            edits.push(PanelEdit::Set(PropertyChange::Password(p.is_password)));
                        }
                    }
                    ElementProps::Checkbox(mut p) => {
                        if text_row(ui, "Label", &mut p.label) {
                            edits.push(PanelEdit::Set(PropertyChange::Label(p.label)));
                        }
                        if check_row(ui, "Checked", &mut p.is_checked) {
                            edits.push(PanelEdit::Set(PropertyChange::Checked(p.is_checked)));
                        }
                    }
                    ElementProps::Slider(mut p) => {
                        if text_row(ui, "Label", &mut p.label) {
                            edits.push(PanelEdit::Set(PropertyChange::Label(p.label)));
                        }
                        numeric_row(ui, "Value", &mut self.fields, NumericKey::Value, &mut edits);
                        numeric_row(ui, "Min", &mut self.fields, NumericKey::Min, &mut edits);
                        numeric_row(ui, "Max", &mut self.fields, NumericKey::Max, &mut edits);
                    }
                    ElementProps::ComboBox(mut p) => {
                        if text_row(ui, "Label", &mut p.label) {
                            edits.push(PanelEdit::Set(PropertyChange::Label(p.label)));
                        }
                        ui.label("Items");
                        if ui
                            .add(egui::TextEdit::multiline(&mut self.items_text).desired_rows(3))
                            .changed()
                        {
                            let items = parse_items(&self.items_text);
                            edits.push(PanelEdit::Set(PropertyChange::Items(items)));
                        }
                        ui.end_row();
                        numeric_row(
                            ui,
                            "Selected",
                            &mut self.fields,
                            NumericKey::SelectedIndex,
                            &mut edits,
                        );
                    }
                }
            });

        if kind != self.draft.kind() {
            self.set_kind(kind);
            return Vec::new();
        }

        edits
            .into_iter()
            .filter_map(|edit| match edit {
                PanelEdit::Set(change) => self.apply(change),
                PanelEdit::Numeric(key) => self.commit(key),
            })
            .collect()
    }
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.label(label);
    let changed = ui.text_edit_singleline(value).changed();
    ui.end_row();
    changed
}

fn check_row(ui: &mut egui::Ui, label: &str, value: &mut bool) -> bool {
    ui.label(label);
    let changed = ui.checkbox(value, "").changed();
    ui.end_row();
    changed
}

fn color_row(ui: &mut egui::Ui, label: &str, color: Rgb) -> Option<Rgb> {
    ui.label(label);
    let mut rgb = color.to_array();
    let changed = ui.color_edit_button_srgb(&mut rgb).changed();
    ui.end_row();
    changed.then(|| Rgb::from_array(rgb))
}

fn numeric_row(
    ui: &mut egui::Ui,
    label: &str,
    fields: &mut NumericFields,
    key: NumericKey,
    edits: &mut Vec<PanelEdit>,
) {
    ui.label(label);
    if fields.get_mut(key).ui(ui) {
        edits.push(PanelEdit::Numeric(key));
    }
    ui.end_row();
}

#[cfg(test)]
mod tests {
    use super::*;

    impl PropertyPanel {
        fn input(&mut self, key: NumericKey, text: &str) {
            self.fields.get_mut(key).input(text);
        }

        fn field_text(&self, key: NumericKey) -> &str {
            &self.fields.get(key).text
        }

        fn draft(&self) -> &Element {
            &self.draft
        }
    }

    #[test]
    fn test_filter_numeric() {
        assert_eq!(filter_numeric("12a.5"), "12.5");
        assert_eq!(filter_numeric("-3e4"), "-34");
        assert_eq!(filter_numeric("abc"), "");
    }

    #[test]
    fn test_defaults_are_button() {
        let panel = PropertyPanel::new();
        let e = panel.new_element();
        assert_eq!(e.kind(), ElementKind::Button);
        assert_eq!(e.pos, pos2(100.0, 100.0));
        match &e.props {
            ElementProps::Button(p) => {
                assert_eq!(p.text, "Button");
                assert_eq!(p.size, vec2(120.0, 30.0));
                assert_eq!(p.style, ButtonStyle::Default);
                assert_eq!(p.background_color, Rgb::GREEN);
                assert_eq!(p.text_color, Rgb::WHITE);
            }
            other => panic!("unexpected props {other:?}"),
        }
        assert_eq!(panel.field_text(NumericKey::X), "100");
        assert_eq!(panel.field_text(NumericKey::Width), "120");
    }

    #[test]
    fn test_commit_position_keeps_other_axis() {
        let mut panel = PropertyPanel::new();
        panel.input(NumericKey::X, "42");
        assert_eq!(
            panel.commit(NumericKey::X),
            Some(PropertyChange::Position(pos2(42.0, 100.0)))
        );
        assert_eq!(panel.draft().pos, pos2(42.0, 100.0));
    }

    #[test]
    fn test_unparsable_commit_keeps_last_value() {
        let mut panel = PropertyPanel::new();
        panel.input(NumericKey::Width, "1-2x");
        assert_eq!(panel.field_text(NumericKey::Width), "1-2");
        assert_eq!(panel.commit(NumericKey::Width), None);
        assert_eq!(panel.draft().size(), Some(vec2(120.0, 30.0)));

        panel.input(NumericKey::Width, "");
        assert_eq!(panel.commit(NumericKey::Width), None);
    }

    #[test]
    fn test_overflowing_float_is_not_committed() {
        let mut panel = PropertyPanel::new();
        panel.set_kind(ElementKind::Slider);
        panel.input(NumericKey::Max, &"9".repeat(40));
        assert_eq!(panel.commit(NumericKey::Max), None);
        panel.input(NumericKey::X, &format!("-{}", "9".repeat(40)));
        assert_eq!(panel.commit(NumericKey::X), None);
        match &panel.draft().props {
            ElementProps::Slider(p) => assert_eq!(p.max_value, 1.0),
            other => panic!("unexpected props {other:?}"),
        }
        assert_eq!(panel.draft().pos, pos2(100.0, 100.0));
    }

    #[test]
    fn test_deselect_clears_fields() {
        let mut panel = PropertyPanel::new();
        let mut e = Element::new(ElementKind::Checkbox, pos2(7.0, 8.0));
        e.id = Some("agree".to_owned());
        panel.follow(Some(&e));
        assert_eq!(panel.draft(), &e);

        panel.follow(None);
        let fresh = panel.new_element();
        assert_eq!(fresh.id, None);
        assert_eq!(fresh.kind(), ElementKind::Button);
        assert_eq!(fresh.pos, pos2(100.0, 100.0));
        assert_eq!(panel.field_text(NumericKey::X), "100");
    }

    #[test]
    fn test_max_length_must_be_positive() {
        let mut panel = PropertyPanel::new();
        panel.set_kind(ElementKind::InputText);
        panel.input(NumericKey::MaxLength, "0");
        assert_eq!(panel.commit(NumericKey::MaxLength), None);
        panel.input(NumericKey::MaxLength, "32");
        assert_eq!(
            panel.commit(NumericKey::MaxLength),
            Some(PropertyChange::MaxLength(32))
        );
    }

    #[test]
    fn test_negative_index_is_ignored() {
        let mut panel = PropertyPanel::new();
        panel.set_kind(ElementKind::ComboBox);
        panel.input(NumericKey::SelectedIndex, "-1");
        assert_eq!(panel.commit(NumericKey::SelectedIndex), None);
    }

    #[test]
    fn test_field_for_other_kind_is_ignored() {
        let mut panel = PropertyPanel::new();
        panel.input(NumericKey::FontSize, "20");
        assert_eq!(panel.commit(NumericKey::FontSize), None);
        assert_eq!(panel.apply(PropertyChange::Checked(true)), None);
    }

    #[test]
    fn test_set_kind_keeps_id_and_position() {
        let mut panel = PropertyPanel::new();
        panel.apply(PropertyChange::Id(Some("volume".into())));
        panel.apply(PropertyChange::Position(pos2(5.0, 6.0)));
        panel.set_kind(ElementKind::Slider);
        let e = panel.new_element();
        assert_eq!(e.kind(), ElementKind::Slider);
        assert_eq!(e.id.as_deref(), Some("volume"));
        assert_eq!(e.pos, pos2(5.0, 6.0));
        assert_eq!(panel.field_text(NumericKey::Value), "0.5");
        assert_eq!(panel.field_text(NumericKey::Max), "1");
    }

    #[test]
    fn test_load_mirrors_element() {
        let mut e = Element::new(ElementKind::ComboBox, pos2(7.0, 8.0));
        e.apply(PropertyChange::Items(vec!["a".into(), "b".into()]))
            .unwrap();
        e.apply(PropertyChange::SelectedIndex(1)).unwrap();
        let mut panel = PropertyPanel::new();
        panel.load(&e);
        assert_eq!(panel.draft(), &e);
        assert_eq!(panel.field_text(NumericKey::X), "7");
        assert_eq!(panel.field_text(NumericKey::SelectedIndex), "1");
        assert_eq!(panel.items_text, "a\nb");

        panel.reset();
        assert_eq!(panel.draft().kind(), ElementKind::Button);
    }

    #[test]
    fn test_parse_items_drops_blank_lines() {
        assert_eq!(parse_items("a\n\n b \n"), vec!["a".to_owned(), "b".to_owned()]);
        assert!(parse_items("").is_empty());
    }
}
