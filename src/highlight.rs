//! Syntax highlighting for the generated C# using syntect.

use egui::Color32;
use egui::text::LayoutJob;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::warn;

/// Cached syntax highlighting resources.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        if !theme_set.themes.contains_key(theme_name) {
            warn!(theme = theme_name, "unknown highlight theme, using the first available");
        }
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name: theme_name.to_owned(),
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight C# code and return a list of (text, color) spans.
    pub fn highlight_csharp(&self, code: &str) -> Vec<(String, Color32)> {
        let Some(theme) = self.theme() else {
            return vec![(code.to_owned(), Color32::LIGHT_GRAY)];
        };
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("cs")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut result = Vec::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    for (style, text) in ranges {
                        result.push((text.to_string(), style_to_color32(style)));
                    }
                }
                Err(_) => {
                    result.push((line.to_string(), Color32::LIGHT_GRAY));
                }
            }
        }

        result
    }

    /// Render highlighted code as a LayoutJob for egui.
    pub fn layout_job(&self, code: &str) -> LayoutJob {
        let mut job = LayoutJob::default();

        for (text, color) in self.highlight_csharp(code) {
            job.append(
                &text,
                0.0,
                egui::TextFormat {
                    font_id: egui::FontId::monospace(12.0),
                    color,
                    ..Default::default()
                },
            );
        }

        job
    }
}

/// Convert syntect Style to egui Color32.
fn style_to_color32(style: Style) -> Color32 {
    Color32::from_rgb(style.foreground.r, style.foreground.g, style.foreground.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ImGui.SetCursorPos(new Vector2(10f, 10f));\n\
                          // Button: Unnamed\n";

    #[test]
    fn test_highlight_covers_whole_text() {
        let highlighter = Highlighter::default();
        let spans = highlighter.highlight_csharp(SAMPLE);
        assert!(!spans.is_empty());
        let joined: String = spans.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(joined, SAMPLE);
    }

    #[test]
    fn test_unknown_theme_still_highlights() {
        let highlighter = Highlighter::new("no-such-theme");
        assert!(!highlighter.highlight_csharp("int x = 1;").is_empty());
    }

    #[test]
    fn test_layout_job() {
        let highlighter = Highlighter::default();
        let job = highlighter.layout_job("bool checkboxValue = false;");
        assert_eq!(job.text, "bool checkboxValue = false;");
    }
}
