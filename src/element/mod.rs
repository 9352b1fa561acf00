use crate::error::ModelError;
use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};
use std::fmt;

/// Discriminant every consumer dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ElementKind {
    Button,
    Text,
    InputText,
    Checkbox,
    Slider,
    ComboBox,
}

impl ElementKind {
    pub(crate) const ALL: [ElementKind; 6] = [
        ElementKind::Button,
        ElementKind::Text,
        ElementKind::InputText,
        ElementKind::Checkbox,
        ElementKind::Slider,
        ElementKind::ComboBox,
    ];

    pub const fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Button => "Button",
            ElementKind::Text => "Text",
            ElementKind::InputText => "Input Text",
            ElementKind::Checkbox => "Checkbox",
            ElementKind::Slider => "Slider",
            ElementKind::ComboBox => "Combo Box",
        }
    }

    /// Token used for generated variable names when the label yields nothing.
    pub const fn binding_fallback(&self) -> &'static str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Text => "text",
            ElementKind::InputText => "input",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Slider => "slider",
            ElementKind::ComboBox => "combo",
        }
    }

    /// Returns the property record a freshly added element of this kind starts with.
    pub fn default_props(&self) -> ElementProps {
        match self {
            ElementKind::Button => ElementProps::Button(ButtonProps {
                text: "Button".into(),
                size: vec2(120.0, 30.0),
                style: ButtonStyle::Default,
                background_color: Rgb::GREEN,
                text_color: Rgb::WHITE,
            }),
            ElementKind::Text => ElementProps::Text(TextProps {
                text: "Text".into(),
                text_color: Rgb::WHITE,
                font_size: 14.0,
                is_bold: false,
            }),
            ElementKind::InputText => ElementProps::InputText(InputTextProps {
                label: "Input".into(),
                value: String::new(),
                size: vec2(200.0, 24.0),
                max_length: 256,
                is_password: false,
            }),
            ElementKind::Checkbox => ElementProps::Checkbox(CheckboxProps {
                label: "Checkbox".into(),
                is_checked: false,
            }),
            ElementKind::Slider => ElementProps::Slider(SliderProps {
                label: "Slider".into(),
                value: 0.5,
                min_value: 0.0,
                max_value: 1.0,
                size: vec2(200.0, 24.0),
            }),
            ElementKind::ComboBox => ElementProps::ComboBox(ComboBoxProps {
                label: "Combo".into(),
                items: vec!["Item 1".into(), "Item 2".into(), "Item 3".into()],
                selected_index: 0,
                size: vec2(200.0, 24.0),
            }),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum ButtonStyle {
    #[default]
    Default,
    Small,
    Large,
    Invisible,
}

impl ButtonStyle {
    pub(crate) const ALL: [ButtonStyle; 4] = [
        ButtonStyle::Default,
        ButtonStyle::Small,
        ButtonStyle::Large,
        ButtonStyle::Invisible,
    ];

    /// Frame padding override pushed around the button, if any.
    pub fn frame_padding(&self) -> Option<Vec2> {
        match self {
            ButtonStyle::Small => Some(vec2(4.0, 2.0)),
            ButtonStyle::Large => Some(vec2(12.0, 8.0)),
            ButtonStyle::Default | ButtonStyle::Invisible => None,
        }
    }
}

/// Opaque 8-bit color; alpha is always 1.0 when rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub(crate) const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ButtonProps {
    pub(crate) text: String,
    pub(crate) size: Vec2,
    pub(crate) style: ButtonStyle,
    pub(crate) background_color: Rgb,
    pub(crate) text_color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextProps {
    pub(crate) text: String,
    pub(crate) text_color: Rgb,
    pub(crate) font_size: f32,
    pub(crate) is_bold: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InputTextProps {
    pub(crate) label: String,
    pub(crate) value: String,
    pub(crate) size: Vec2,
    /// Buffer capacity in bytes, terminator included.
    pub(crate) max_length: usize,
    pub(crate) is_password: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CheckboxProps {
    pub(crate) label: String,
    pub(crate) is_checked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SliderProps {
    pub(crate) label: String,
    pub(crate) value: f32,
    pub(crate) min_value: f32,
    pub(crate) max_value: f32,
    pub(crate) size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ComboBoxProps {
    pub(crate) label: String,
    pub(crate) items: Vec<String>,
    pub(crate) selected_index: usize,
    pub(crate) size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ElementProps {
    Button(ButtonProps),
    Text(TextProps),
    InputText(InputTextProps),
    Checkbox(CheckboxProps),
    Slider(SliderProps),
    ComboBox(ComboBoxProps),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Element {
    pub(crate) id: Option<String>,
    pub(crate) pos: Pos2, // top-left relative to the design canvas
    pub(crate) props: ElementProps,
}

/// Name of a single settable property, used for change reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Property {
    Id,
    Position,
    Text,
    Size,
    Style,
    BackgroundColor,
    TextColor,
    FontSize,
    Bold,
    Label,
    Value,
    MaxLength,
    Password,
    Checked,
    MinValue,
    MaxValue,
    Items,
    SelectedIndex,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single property write. Every mutation of an element goes through one of these.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PropertyChange {
    Id(Option<String>),
    Position(Pos2),
    Text(String),
    Size(Vec2),
    Style(ButtonStyle),
    BackgroundColor(Rgb),
    TextColor(Rgb),
    FontSize(f32),
    Bold(bool),
    Label(String),
    InputValue(String),
    SliderValue(f32),
    MaxLength(usize),
    Password(bool),
    Checked(bool),
    MinValue(f32),
    MaxValue(f32),
    Items(Vec<String>),
    SelectedIndex(usize),
}

impl PropertyChange {
    pub fn property(&self) -> Property {
        match self {
            PropertyChange::Id(_) => Property::Id,
            PropertyChange::Position(_) => Property::Position,
            PropertyChange::Text(_) => Property::Text,
            PropertyChange::Size(_) => Property::Size,
            PropertyChange::Style(_) => Property::Style,
            PropertyChange::BackgroundColor(_) => Property::BackgroundColor,
            PropertyChange::TextColor(_) => Property::TextColor,
            PropertyChange::FontSize(_) => Property::FontSize,
            PropertyChange::Bold(_) => Property::Bold,
            PropertyChange::Label(_) => Property::Label,
            PropertyChange::InputValue(_) | PropertyChange::SliderValue(_) => Property::Value,
            PropertyChange::MaxLength(_) => Property::MaxLength,
            PropertyChange::Password(_) => Property::Password,
            PropertyChange::Checked(_) => Property::Checked,
            PropertyChange::MinValue(_) => Property::MinValue,
            PropertyChange::MaxValue(_) => Property::MaxValue,
            PropertyChange::Items(_) => Property::Items,
            PropertyChange::SelectedIndex(_) => Property::SelectedIndex,
        }
    }
}

impl Element {
    pub fn new(kind: ElementKind, pos: Pos2) -> Self {
        Self {
            id: None,
            pos,
            props: kind.default_props(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self.props {
            ElementProps::Button(_) => ElementKind::Button,
            ElementProps::Text(_) => ElementKind::Text,
            ElementProps::InputText(_) => ElementKind::InputText,
            ElementProps::Checkbox(_) => ElementKind::Checkbox,
            ElementProps::Slider(_) => ElementKind::Slider,
            ElementProps::ComboBox(_) => ElementKind::ComboBox,
        }
    }

    /// Name shown in generated comments.
    pub fn code_name(&self) -> &str {
        self.id.as_deref().unwrap_or("Unnamed")
    }

    /// Human-facing name for status messages: id, else caption, else "Unnamed".
    pub fn display_name(&self) -> &str {
        if let Some(id) = self.id.as_deref() {
            return id;
        }
        let caption = match &self.props {
            ElementProps::Button(p) => p.text.as_str(),
            ElementProps::Text(p) => p.text.as_str(),
            ElementProps::InputText(p) => p.label.as_str(),
            ElementProps::Checkbox(p) => p.label.as_str(),
            ElementProps::Slider(p) => p.label.as_str(),
            ElementProps::ComboBox(p) => p.label.as_str(),
        };
        if caption.is_empty() { "Unnamed" } else { caption }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.props {
            ElementProps::InputText(p) => Some(&p.label),
            ElementProps::Checkbox(p) => Some(&p.label),
            ElementProps::Slider(p) => Some(&p.label),
            ElementProps::ComboBox(p) => Some(&p.label),
            ElementProps::Button(_) | ElementProps::Text(_) => None,
        }
    }

    /// Stored size, for the kinds that carry one.
    pub fn size(&self) -> Option<Vec2> {
        match &self.props {
            ElementProps::Button(p) => Some(p.size),
            ElementProps::InputText(p) => Some(p.size),
            ElementProps::Slider(p) => Some(p.size),
            ElementProps::ComboBox(p) => Some(p.size),
            ElementProps::Text(_) | ElementProps::Checkbox(_) => None,
        }
    }

    /// Extent used for hit testing and drag clamping.
    pub fn extent(&self) -> Vec2 {
        if let Some(size) = self.size() {
            return size;
        }
        match &self.props {
            ElementProps::Text(p) => {
                let chars = p.text.chars().count().max(1) as f32;
                vec2(chars * p.font_size * 0.5, p.font_size * 1.25)
            }
            ElementProps::Checkbox(p) => vec2(24.0 + p.label.chars().count() as f32 * 7.0, 20.0),
            _ => Vec2::ZERO,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.extent())
    }

    /// Writes one property. Ranges are not validated here.
    pub fn apply(&mut self, change: PropertyChange) -> Result<Property, ModelError> {
        let property = change.property();
        let kind = self.kind();
        let not_applicable = || ModelError::NotApplicable { kind, property };

        match change {
            PropertyChange::Id(id) => self.id = id,
            PropertyChange::Position(pos) => self.pos = pos,
            PropertyChange::Text(text) => match &mut self.props {
                ElementProps::Button(p) => p.text = text,
                ElementProps::Text(p) => p.text = text,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Size(size) => match &mut self.props {
                ElementProps::Button(p) => p.size = size,
                ElementProps::InputText(p) => p.size = size,
                ElementProps::Slider(p) => p.size = size,
                ElementProps::ComboBox(p) => p.size = size,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Style(style) => match &mut self.props {
                ElementProps::Button(p) => p.style = style,
                _ => return Err(not_applicable()),
            },
            PropertyChange::BackgroundColor(color) => match &mut self.props {
                ElementProps::Button(p) => p.background_color = color,
                _ => return Err(not_applicable()),
            },
            PropertyChange::TextColor(color) => match &mut self.props {
                ElementProps::Button(p) => p.text_color = color,
                ElementProps::Text(p) => p.text_color = color,
                _ => return Err(not_applicable()),
            },
            PropertyChange::FontSize(size) => match &mut self.props {
                ElementProps::Text(p) => p.font_size = size,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Bold(bold) => match &mut self.props {
                ElementProps::Text(p) => p.is_bold = bold,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Label(label) => match &mut self.props {
                ElementProps::InputText(p) => p.label = label,
                ElementProps::Checkbox(p) => p.label = label,
                ElementProps::Slider(p) => p.label = label,
                ElementProps::ComboBox(p) => p.label = label,
                _ => return Err(not_applicable()),
            },
            PropertyChange::InputValue(value) => match &mut self.props {
                ElementProps::InputText(p) => p.value = value,
                _ => return Err(not_applicable()),
            },
            PropertyChange::SliderValue(value) => match &mut self.props {
                ElementProps::Slider(p) => p.value = value,
                _ => return Err(not_applicable()),
            },
            PropertyChange::MaxLength(len) => match &mut self.props {
                ElementProps::InputText(p) => p.max_length = len,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Password(on) => match &mut self.props {
                ElementProps::InputText(p) => p.is_password = on,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Checked(on) => match &mut self.props {
                ElementProps::Checkbox(p) => p.is_checked = on,
                _ => return Err(not_applicable()),
            },
            PropertyChange::MinValue(v) => match &mut self.props {
                ElementProps::Slider(p) => p.min_value = v,
                _ => return Err(not_applicable()),
            },
            PropertyChange::MaxValue(v) => match &mut self.props {
                ElementProps::Slider(p) => p.max_value = v,
                _ => return Err(not_applicable()),
            },
            PropertyChange::Items(items) => match &mut self.props {
                ElementProps::ComboBox(p) => p.items = items,
                _ => return Err(not_applicable()),
            },
            PropertyChange::SelectedIndex(index) => match &mut self.props {
                ElementProps::ComboBox(p) => p.selected_index = index,
                _ => return Err(not_applicable()),
            },
        }
        Ok(property)
    }
}

/// Generated variable stem: spaces removed, lowercased, `fallback` when nothing is left.
pub(crate) fn binding_name(label: &str, fallback: &str) -> String {
    let token: String = label.chars().filter(|c| *c != ' ').collect();
    if token.is_empty() {
        fallback.to_owned()
    } else {
        token.to_lowercase()
    }
}

/// The part of `value` that fits an input buffer of `max_length` bytes.
/// One byte is reserved for the terminator; cuts land on a char boundary.
pub(crate) fn fit_to_buffer(value: &str, max_length: usize) -> &str {
    let cap = max_length.saturating_sub(1);
    if value.len() <= cap {
        return value;
    }
    let mut end = cap;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Position used when the property panel has nothing better.
pub(crate) const DEFAULT_POSITION: Pos2 = pos2(100.0, 100.0);
