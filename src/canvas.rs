//! Design canvas: picking, bounded dragging, and the proxy painting.
//!
//! All points here are canvas-local (origin at the canvas' top-left corner).

use crate::design::Design;
use crate::element::{Element, ElementProps, PropertyChange};
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};
use tracing::{debug, warn};

/// Inclusive on every edge.
fn contains(rect: Rect, point: Pos2) -> bool {
    rect.min.x <= point.x && point.x <= rect.max.x && rect.min.y <= point.y && point.y <= rect.max.y
}

/// Index of the topmost element under `point` (last drawn wins).
pub(crate) fn hit_test(elements: &[Element], point: Pos2) -> Option<usize> {
    elements
        .iter()
        .rposition(|element| contains(element.rect(), point))
}

/// Clamps each axis into `[0, container - extent]`.
///
/// An element larger than the container is pinned to 0 on that axis.
pub(crate) fn clamp_position(pos: Pos2, extent: Vec2, container: Vec2) -> Pos2 {
    Pos2::new(
        pos.x.min(container.x - extent.x).max(0.0),
        pos.y.min(container.y - extent.y).max(0.0),
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DragState {
    Idle,
    Dragging {
        index: usize,
        /// Pointer position relative to the element origin at grab time.
        grab: Vec2,
    },
}

pub(crate) struct DragEngine {
    state: DragState,
    container: Vec2,
}

impl DragEngine {
    pub fn new(container: Vec2) -> Self {
        Self {
            state: DragState::Idle,
            container,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn set_container(&mut self, container: Vec2) {
        self.container = container;
    }

    /// Picks and selects the element under `point`. A miss clears the selection.
    pub fn pointer_down(&mut self, design: &mut Design, point: Pos2) -> Option<usize> {
        let Some(index) = hit_test(design.elements(), point) else {
            design.deselect();
            self.state = DragState::Idle;
            return None;
        };
        let grab = point - design.elements()[index].pos;
        if let Err(err) = design.select(index) {
            warn!(%err, "hit element vanished");
            return None;
        }
        debug!(index, "drag started");
        self.state = DragState::Dragging { index, grab };
        Some(index)
    }

    /// Moves the dragged element and returns its clamped position.
    pub fn pointer_move(&mut self, design: &mut Design, point: Pos2) -> Option<Pos2> {
        let DragState::Dragging { index, grab } = self.state else {
            return None;
        };
        let Some(element) = design.elements().get(index) else {
            warn!(index, "drag target vanished");
            self.state = DragState::Idle;
            return None;
        };
        let extent = element.extent();
        let pos = clamp_position(point - grab, extent, self.container);
        match design.apply(index, PropertyChange::Position(pos)) {
            Ok(_) => Some(pos),
            Err(err) => {
                warn!(%err, "drag target vanished");
                self.state = DragState::Idle;
                None
            }
        }
    }

    /// Ends the gesture and returns the index that was being dragged.
    pub fn pointer_up(&mut self, design: &mut Design) -> Option<usize> {
        let DragState::Dragging { index, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        design.regenerate();
        debug!(index, "drag finished");
        Some(index)
    }
}

/// Paints every element as a proxy rectangle; `origin` is the canvas' screen position.
pub(crate) fn paint_elements(
    painter: &Painter,
    origin: Pos2,
    elements: &[Element],
    selected: Option<usize>,
) {
    for (i, element) in elements.iter().enumerate() {
        let rect = element.rect().translate(origin.to_vec2());
        let (fill, text_color, caption) = match &element.props {
            ElementProps::Button(p) => (
                p.background_color.to_color32(),
                p.text_color.to_color32(),
                p.text.as_str(),
            ),
            ElementProps::Text(p) => (Color32::TRANSPARENT, p.text_color.to_color32(), p.text.as_str()),
            _ => (
                Color32::from_gray(50),
                Color32::LIGHT_GRAY,
                element.label().unwrap_or_default(),
            ),
        };
        painter.rect_filled(rect, CornerRadius::same(4), fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            caption,
            FontId::proportional(13.0),
            text_color,
        );
        let stroke = if selected == Some(i) {
            Stroke::new(2.0, Color32::LIGHT_BLUE)
        } else {
            Stroke::new(1.0, Color32::GRAY)
        };
        painter.rect_stroke(rect, CornerRadius::same(4), stroke, StrokeKind::Outside);
    }
}
