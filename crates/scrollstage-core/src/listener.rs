//! Outbound notifications to the host application

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::section::VisualVariant;

/// Something the orchestrator tells its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScrollEvent {
    IndexChanged { index: usize, total: usize },
    VariantChanged { variant: VisualVariant },
}

/// Receives index and header-variant changes
pub trait ScrollListener {
    fn on_index_change(&mut self, index: usize, total: usize);

    fn on_visual_variant_change(&mut self, _variant: VisualVariant) {}
}

/// Adapter for a plain `on_index_change(index, total)` callback
pub struct OnIndexChange<F>(pub F);

impl<F> ScrollListener for OnIndexChange<F>
where
    F: FnMut(usize, usize),
{
    fn on_index_change(&mut self, index: usize, total: usize) {
        (self.0)(index, total)
    }
}

/// Records events; clones share one log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ScrollEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScrollEvent> {
        self.events.borrow().clone()
    }

    /// Index notifications only
    pub fn indices(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ScrollEvent::IndexChanged { index, .. } => Some(*index),
                ScrollEvent::VariantChanged { .. } => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<ScrollEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl ScrollListener for EventLog {
    fn on_index_change(&mut self, index: usize, total: usize) {
        self.events
            .borrow_mut()
            .push(ScrollEvent::IndexChanged { index, total });
    }

    fn on_visual_variant_change(&mut self, variant: VisualVariant) {
        self.events
            .borrow_mut()
            .push(ScrollEvent::VariantChanged { variant });
    }
}

impl ScrollListener for mpsc::UnboundedSender<ScrollEvent> {
    fn on_index_change(&mut self, index: usize, total: usize) {
        // Receiver gone means the host is shutting down
        let _ = self.send(ScrollEvent::IndexChanged { index, total });
    }

    fn on_visual_variant_change(&mut self, variant: VisualVariant) {
        let _ = self.send(ScrollEvent::VariantChanged { variant });
    }
}
