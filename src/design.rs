//! The design collection: ordered elements, the single selection, and the
//! code text derived from them.
//!
//! Every mutating call regenerates the code text before returning, so readers
//! never see code that lags the elements.

use crate::codegen;
use crate::element::{Element, ElementKind, Property, PropertyChange};
use crate::error::ModelError;
use crate::render::FrameReport;
use egui::{pos2, vec2};
use tracing::{debug, info, warn};

pub(crate) struct Design {
    elements: Vec<Element>,
    selected: Option<usize>,
    code: String,
    /// Bumped on every regeneration.
    revision: u64,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    pub fn new() -> Self {
        let mut design = Self {
            elements: Vec::new(),
            selected: None,
            code: String::new(),
            revision: 0,
        };
        design.regenerate();
        design
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|i| self.elements.get(i))
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Appends `element`, selects it and returns its index.
    pub fn add(&mut self, element: Element) -> usize {
        let index = self.elements.len();
        info!(
            kind = %element.kind(),
            name = element.display_name(),
            index,
            "element added"
        );
        self.elements.push(element);
        self.selected = Some(index);
        self.regenerate();
        index
    }

    /// Removes every element and drops the selection.
    pub fn clear(&mut self) {
        info!(count = self.elements.len(), "design cleared");
        self.elements.clear();
        self.selected = None;
        self.regenerate();
    }

    /// Writes one property of the element at `index`.
    pub fn apply(&mut self, index: usize, change: PropertyChange) -> Result<Property, ModelError> {
        let len = self.elements.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfRange { index, len })?;
        let property = element.apply(change)?;
        self.regenerate();
        Ok(property)
    }

    pub fn select(&mut self, index: usize) -> Result<(), ModelError> {
        if index >= self.elements.len() {
            return Err(ModelError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        if self.selected != Some(index) {
            debug!(index, "selection changed");
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        if self.selected.take().is_some() {
            debug!("selection cleared");
        }
    }

    /// Adds a default "Test Button" when the collection is empty.
    pub fn seed_if_empty(&mut self) -> bool {
        if !self.elements.is_empty() {
            return false;
        }
        let mut button = Element::new(ElementKind::Button, pos2(50.0, 50.0));
        // the default record already carries the other seed values
        let seeded = button
            .apply(PropertyChange::Text("Test Button".into()))
            .and_then(|_| button.apply(PropertyChange::Size(vec2(120.0, 30.0))));
        if let Err(err) = seeded {
            warn!(%err, "could not build seed element");
            return false;
        }
        self.add(button);
        true
    }

    /// Writes widget edits from a preview frame back into the elements.
    ///
    /// Stale indices (the collection shrank since the frame) are skipped.
    pub fn apply_report(&mut self, report: &FrameReport) -> usize {
        let mut applied = 0;
        for (index, change) in &report.edits {
            match self.apply(*index, change.clone()) {
                Ok(_) => applied += 1,
                Err(err) => warn!(%err, "dropping preview edit"),
            }
        }
        applied
    }

    pub(crate) fn regenerate(&mut self) {
        codegen::generate_into(&mut self.code, &self.elements);
        self.revision += 1;
    }
}
