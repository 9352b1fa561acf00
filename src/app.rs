use crate::{
    canvas::{self, DragEngine, DragState},
    config::DesignerConfig,
    design::Design,
    element::Element,
    highlight::Highlighter,
    panel::PropertyPanel,
    preview::{self, PreviewSession, TickOutcome},
    render::Placement,
    surface::EguiSurface,
};
use egui::{Color32, Pos2, Rect, Sense, UiBuilder, text::LayoutJob, vec2};
use egui_extras::{Column, TableBuilder};
use std::time::{Duration, Instant};
use tracing::{error, info};

pub(crate) struct DesignerApp {
    config: DesignerConfig,
    design: Design,
    panel: PropertyPanel,
    /// Selection the panel was last loaded from
    panel_source: Option<usize>,
    drag: DragEngine,
    /// Syntax highlighter for the code panel
    highlighter: Highlighter,
    syntax_highlighting: bool,
    /// Highlighted code and the design revision it was built from
    highlighted: Option<(u64, LayoutJob)>,
    embedded: Option<PreviewSession>,
    window: Option<PreviewSession>,
    /// Status message to display
    status_message: Option<(String, Instant)>,
}

impl DesignerApp {
    pub fn new(config: DesignerConfig) -> Self {
        let mut app = Self {
            design: Design::new(),
            panel: PropertyPanel::new(),
            panel_source: None,
            drag: DragEngine::new(config.canvas_size),
            highlighter: Highlighter::new(&config.highlight_theme),
            syntax_highlighting: config.syntax_highlighting,
            highlighted: None,
            embedded: None,
            window: None,
            status_message: None,
            config,
        };
        app.set_status("Ready to design ImGui elements");
        app
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.config.preview_interval_ms.max(1))
    }

    /// Set a status message that will auto-clear after a few seconds
    fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        info!(status = %msg);
        self.status_message = Some((msg, Instant::now()));
    }

    fn add_element(&mut self) {
        let element = self.panel.new_element();
        let kind = element.kind();
        let name = element.display_name().to_owned();
        self.design.add(element);
        self.set_status(format!("Added {kind}: {name}"));
    }

    fn clear_all(&mut self) {
        self.design.clear();
        self.panel.reset();
        self.panel_source = None;
        self.set_status("Cleared all elements");
    }

    fn select(&mut self, index: usize) {
        match self.design.select(index) {
            Ok(()) => self.report_selection(),
            Err(err) => self.set_status(format!("Selection failed: {err}")),
        }
    }

    fn report_selection(&mut self) {
        let msg = match self.design.selected_element() {
            Some(e) => format!("Selected {}: {}", e.kind(), e.display_name()),
            None => "No element selected".to_owned(),
        };
        self.set_status(msg);
    }

    /// Reloads the property panel when the selection changed underneath it.
    fn sync_panel(&mut self) {
        let selected = self.design.selected();
        if selected == self.panel_source {
            return;
        }
        self.panel.follow(self.design.selected_element());
        self.panel_source = selected;
    }

    fn open_embedded(&mut self) {
        if self.design.seed_if_empty() {
            self.set_status("Added Test Button to the empty design");
        }
        self.embedded = Some(PreviewSession::embedded(self.interval()));
        self.set_status(format!(
            "Updated preview with {} elements",
            self.design.len()
        ));
    }

    fn open_window(&mut self) {
        self.window = Some(PreviewSession::window(self.interval()));
        self.set_status(format!(
            "Updated preview with {} elements",
            self.design.len()
        ));
    }

    fn close_session(session: &mut Option<PreviewSession>) {
        if let Some(mut session) = session.take() {
            session.close();
        }
    }

    fn handle_outcome(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Rendered(report) if !report.is_empty() => {
                self.design.apply_report(&report);
                let selected = self.design.selected();
                if report.edits.iter().any(|(i, _)| Some(*i) == selected)
                    && let Some(element) = self.design.selected_element()
                {
                    self.panel.load(element);
                }
                for index in report.activated {
                    self.notify_click(index);
                }
            }
            TickOutcome::Rendered(_) | TickOutcome::Closed => {}
            TickOutcome::Failed(err) => {
                self.set_status(format!(
                    "Preview render failed: {}",
                    preview::describe_failure(&err)
                ));
            }
        }
    }

    fn notify_click(&mut self, index: usize) {
        let Some(name) = self
            .design
            .elements()
            .get(index)
            .map(|e| e.display_name().to_owned())
        else {
            return;
        };
        self.set_status(format!("Button clicked: {name}"));
        if self.config.click_dialog {
            rfd::MessageDialog::new()
                .set_title("Button Clicked")
                .set_description(format!("Button '{name}' was clicked!"))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }

    fn export_code(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("C# source", &["cs"])
            .set_file_name("ImGuiLayout.cs")
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, self.design.code()) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => {
                error!(path = %path.display(), %e, "export failed");
                self.set_status(format!("Export failed: {e}"));
            }
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .button("Export Code...")
                    .on_hover_text("Save the generated code as a .cs file")
                    .clicked()
                {
                    self.export_code();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Add Element").clicked() {
                    self.add_element();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui
                    .button("Clear All")
                    .on_hover_text("Remove every element")
                    .clicked()
                {
                    self.clear_all();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Generate Code").clicked() {
                    self.design.regenerate();
                    self.set_status("Code generated");
                    ui.close_kind(egui::UiKind::Menu);
                }
            });

            ui.menu_button("Preview", |ui| {
                let mut embedded = self.embedded.is_some();
                if ui.checkbox(&mut embedded, "Live Preview Panel").changed() {
                    if embedded {
                        self.open_embedded();
                    } else {
                        Self::close_session(&mut self.embedded);
                    }
                }
                let mut window = self.window.is_some();
                if ui.checkbox(&mut window, "Preview Window").changed() {
                    if window {
                        self.open_window();
                    } else {
                        Self::close_session(&mut self.window);
                    }
                }
            });
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed().as_secs() < 3 {
                ui.label(msg);
                ui.ctx().request_repaint_after(Duration::from_millis(500));
            } else {
                self.status_message = None;
            }
        }
        if self.status_message.is_none() {
            ui.weak(format!("{} elements", self.design.len()));
        }
    }

    fn properties_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        let bound = self.design.selected();
        let changes = self.panel.ui(ui, bound.is_some());
        if let Some(index) = bound {
            for change in changes {
                if let Err(err) = self.design.apply(index, change) {
                    self.set_status(format!("Edit rejected: {err}"));
                }
            }
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Add Element").clicked() {
                self.add_element();
            }
            if ui
                .add_enabled(bound.is_some(), egui::Button::new("Deselect"))
                .clicked()
            {
                self.design.deselect();
                self.report_selection();
            }
            if ui.button("Clear All").clicked() {
                self.clear_all();
            }
        });

        ui.separator();
        ui.heading("Elements");
        if let Some(index) = element_table(ui, self.design.elements(), self.design.selected()) {
            self.select(index);
        }
    }

    fn code_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Generated Code");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Export...").clicked() {
                    self.export_code();
                }
                if ui.button("Copy").clicked() {
                    ui.ctx().copy_text(self.design.code().to_owned());
                    self.set_status("Code copied to clipboard");
                }
                ui.checkbox(&mut self.syntax_highlighting, "Highlight")
                    .on_hover_text("Toggle syntax highlighting");
            });
        });
        ui.label("Paste this into your ImGui.NET render loop.");

        egui::ScrollArea::both()
            .id_salt("generated_code_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.syntax_highlighting {
                    let revision = self.design.revision();
                    let stale = !matches!(&self.highlighted, Some((r, _)) if *r == revision);
                    if stale {
                        let job = self.highlighter.layout_job(self.design.code());
                        self.highlighted = Some((revision, job));
                    }
                    if let Some((_, job)) = &self.highlighted {
                        ui.add(egui::Label::new(job.clone()).selectable(true));
                    }
                } else {
                    let mut code = self.design.code();
                    ui.add(
                        egui::TextEdit::multiline(&mut code)
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                }
            });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let size = self.config.canvas_size;
        self.drag.set_container(size);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Color32::from_gray(30));

        let local = |p: Pos2| Pos2::ZERO + (p - rect.min);
        let (pressed, released, moved, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.interact_pos(),
            )
        });

        if pressed
            && response.hovered()
            && let Some(p) = pointer
        {
            match self.drag.pointer_down(&mut self.design, local(p)) {
                Some(_) => self.report_selection(),
                None => self.set_status("No element selected"),
            }
        }

        if moved
            && let Some(p) = pointer
            && let Some(pos) = self.drag.pointer_move(&mut self.design, local(p))
        {
            self.panel.set_position(pos);
            if let Some(e) = self.design.selected_element() {
                let msg = format!("Dragging {} to ({}, {})", e.kind(), pos.x.round(), pos.y.round());
                self.set_status(msg);
            }
        }

        if released
            && matches!(self.drag.state(), DragState::Dragging { .. })
            && let Some(index) = self.drag.pointer_up(&mut self.design)
            && let Some(kind) = self.design.elements().get(index).map(Element::kind)
        {
            self.set_status(format!("{kind} positioned"));
        }

        canvas::paint_elements(&painter, rect.min, self.design.elements(), self.design.selected());
    }

    fn embedded_ui(&mut self, ui: &mut egui::Ui) -> Option<TickOutcome> {
        let session = self.embedded.as_mut()?;
        ui.horizontal(|ui| {
            ui.strong("Live Preview");
            if let Some(state) = session.state()
                && state.failures > 0
            {
                ui.weak(format!("{} of {} frames failed", state.failures, state.frames));
            }
        });
        if self.design.is_empty() {
            ui.label("No elements to display. Add some elements first!");
            return None;
        }
        ui.label(format!("Elements count: {}", self.design.len()));
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        ui.painter().rect_filled(rect, 0.0, Color32::from_gray(20));
        let placement = Placement::scaled(rect.size());
        Some(run_session(ui, rect, session, self.design.elements(), placement))
    }

    fn preview_window(&mut self, ctx: &egui::Context) -> Option<TickOutcome> {
        let session = self.window.as_mut()?;
        let viewport = session.viewport()?;
        let elements = self.design.elements();
        let window_size = self.config.preview_window_size;
        let mut close_requested = false;

        let outcome = ctx.show_viewport_immediate(
            viewport,
            egui::ViewportBuilder::default()
                .with_title("ImGui Preview")
                .with_inner_size(window_size),
            |ctx, _class| {
                close_requested = ctx.input(|i| i.viewport().close_requested());
                let panel = preview_panel_rect(window_size);
                egui::Window::new("ImGui Designer Preview")
                    .fixed_pos(panel.min)
                    .fixed_size(panel.size())
                    .collapsible(false)
                    .movable(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        // measured from the panel corner, so +30 clears the title bar
                        run_session(ui, panel, session, elements, Placement::DESIGN)
                    })
                    .and_then(|inner| inner.inner)
            },
        );

        if close_requested {
            Self::close_session(&mut self.window);
            self.set_status("Preview window closed");
        }
        outcome
    }
}

/// Outer rect of the fixed panel inside a preview viewport of `viewport_size`.
fn preview_panel_rect(viewport_size: egui::Vec2) -> Rect {
    Rect::from_min_size(Pos2::new(10.0, 10.0), viewport_size - vec2(20.0, 20.0))
}

/// One preview tick drawn into `rect` of `ui`.
fn run_session(
    ui: &mut egui::Ui,
    rect: Rect,
    session: &mut PreviewSession,
    elements: &[Element],
    placement: Placement,
) -> TickOutcome {
    let mut child = ui.new_child(UiBuilder::new().max_rect(rect));
    child.set_clip_rect(rect);
    let mut surface = EguiSurface::new(&mut child, rect.min);
    session.tick(&mut surface, elements, placement)
}

/// Index, kind, name and position of every element. Returns the clicked row.
fn element_table(ui: &mut egui::Ui, elements: &[Element], selected: Option<usize>) -> Option<usize> {
    let mut clicked = None;
    TableBuilder::new(ui)
        .id_salt("element_table")
        .striped(true)
        .sense(Sense::click())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Kind");
            });
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Position");
            });
        })
        .body(|mut body| {
            for (i, element) in elements.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.set_selected(selected == Some(i));
                    row.col(|ui| {
                        ui.label(i.to_string());
                    });
                    row.col(|ui| {
                        ui.label(element.kind().display_name());
                    });
                    row.col(|ui| {
                        ui.label(element.display_name());
                    });
                    row.col(|ui| {
                        ui.label(format!("{}, {}", element.pos.x, element.pos.y));
                    });
                    if row.response().clicked() {
                        clicked = Some(i);
                    }
                });
            }
        });
    clicked
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        egui::SidePanel::left("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("properties_scroll")
                    .show(ui, |ui| self.properties_ui(ui));
            });

        egui::SidePanel::right("code")
            .default_width(460.0)
            .show(ctx, |ui| self.code_panel(ui));

        let mut outcomes = Vec::new();
        if self.embedded.is_some() {
            let outcome = egui::TopBottomPanel::bottom("embedded_preview")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| self.embedded_ui(ui))
                .inner;
            outcomes.extend(outcome);
        }

        egui::CentralPanel::default().show(ctx, |ui| self.canvas_ui(ui));

        outcomes.extend(self.preview_window(ctx));
        for outcome in outcomes {
            self.handle_outcome(outcome);
        }

        self.sync_panel();

        let next_tick = [self.embedded.as_ref(), self.window.as_ref()]
            .into_iter()
            .flatten()
            .filter(|s| s.is_open())
            .filter_map(|s| s.clock().next_tick())
            .min();
        if let Some(delay) = next_tick {
            ctx.request_repaint_after(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, PropertyChange};
    use egui::pos2;

    #[test]
    fn test_preview_origin_is_panel_corner() {
        let panel = preview_panel_rect(vec2(800.0, 600.0));
        assert_eq!(panel.min, pos2(10.0, 10.0));
        assert_eq!(panel.size(), vec2(780.0, 580.0));
        let cursor = panel.min + Placement::DESIGN.cursor(pos2(0.0, 0.0)).to_vec2();
        assert_eq!(cursor, pos2(20.0, 40.0));
    }

    #[test]
    fn test_deselect_resets_panel_before_add() {
        let mut app = DesignerApp::new(DesignerConfig::default());
        let mut e = Element::new(ElementKind::Checkbox, pos2(5.0, 5.0));
        e.id = Some("agree".to_owned());
        app.design.add(e);
        app.sync_panel();
        assert_eq!(app.panel.new_element().id.as_deref(), Some("agree"));

        app.design.deselect();
        app.sync_panel();
        app.add_element();
        let added = &app.design.elements()[1];
        assert_eq!(added.id, None);
        assert_eq!(added.kind(), ElementKind::Button);
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let mut app = DesignerApp::new(DesignerConfig::default());
        app.add_element();
        app.sync_panel();
        assert_eq!(
            app.design.apply(0, PropertyChange::Id(Some("ok".to_owned()))),
            Ok(crate::element::Property::Id)
        );
        app.clear_all();
        app.sync_panel();
        assert!(app.design.is_empty());
        assert_eq!(app.design.selected(), None);
        assert_eq!(app.panel.new_element().id, None);
    }
}
