//! Scripted gesture traces
//!
//! A trace describes a container (viewport height and section content
//! heights) and a list of steps: raw input, clock ticks, inner scrolls and,
//! in native mode, container scroll positions. Replaying it headlessly gives
//! the notifications a host would have received.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ScrollerConfig, VisibilityConfig};
use crate::coordinator::ScrollCoordinator;
use crate::deck::Deck;
use crate::gesture::InputEvent;
use crate::listener::{EventLog, ScrollEvent};
use crate::orchestrator::{Disposition, Orchestrator};
use crate::section::{stack_layout, Geometry, SectionSpec, VisualVariant};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default)]
    pub sections: Vec<TraceSection>,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSection {
    /// Content height; defaults to exactly one viewport
    #[serde(default)]
    pub content_height: Option<f32>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub overflow_auto: bool,
    #[serde(default)]
    pub variant: Option<VisualVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStep {
    Input(InputEvent),
    Tick { at_ms: u64 },
    /// Inner scroll of the section at `section` (display index)
    SectionScroll { section: usize, scroll_top: f32 },
    /// Container scrolled to `top` (native mode)
    Observe { top: f32 },
}

/// Outcome of replaying a trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceReport {
    pub events: Vec<ScrollEvent>,
    pub dispositions: Vec<StepOutcome>,
    pub final_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Ignored,
    ConsumedLocally,
    Rejected,
    TransitionStarted { from: usize, to: usize },
    Committed { index: usize },
    Idle,
}

impl From<Disposition> for StepOutcome {
    fn from(disposition: Disposition) -> Self {
        match disposition {
            Disposition::Ignored => StepOutcome::Ignored,
            Disposition::ConsumedLocally => StepOutcome::ConsumedLocally,
            Disposition::Rejected => StepOutcome::Rejected,
            Disposition::TransitionStarted(ticket) => StepOutcome::TransitionStarted {
                from: ticket.from,
                to: ticket.to,
            },
        }
    }
}

fn default_viewport_height() -> f32 {
    500.0
}

fn default_true() -> bool {
    true
}

impl Trace {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Replace the section list with one derived from content heights
    pub fn with_content_heights(mut self, heights: &[f32]) -> Self {
        self.sections = heights
            .iter()
            .map(|&h| TraceSection {
                content_height: Some(h),
                overflow_auto: true,
                ..TraceSection::default()
            })
            .collect();
        self
    }

    /// Take section markers from a deck; an empty section list becomes one
    /// viewport-sized section per deck section
    pub fn with_deck(mut self, deck: &Deck) -> Self {
        if self.sections.is_empty() {
            self.sections = vec![TraceSection::default(); deck.len()];
        }
        for (section, marked) in self.sections.iter_mut().zip(&deck.sections) {
            section.disabled = marked.disabled;
            section.overflow_auto = marked.overflow_auto;
            section.variant = marked.variant;
        }
        self
    }

    /// Build a mounted orchestrator for this trace's container
    pub fn orchestrator(
        &self,
        scroller: &ScrollerConfig,
        visibility: &VisibilityConfig,
        log: EventLog,
    ) -> Result<Orchestrator> {
        let mut orchestrator = Orchestrator::new(
            0,
            scroller,
            visibility,
            ScrollCoordinator::new(),
            Box::new(log),
        );

        let heights: Vec<f32> = self
            .sections
            .iter()
            .map(|s| s.content_height.unwrap_or(self.viewport_height))
            .collect();
        let layout = stack_layout(&heights, self.viewport_height);

        for (section, (extent, geometry)) in self.sections.iter().zip(layout) {
            let mut spec = SectionSpec::default()
                .with_extent(extent)
                .with_geometry(geometry)
                .disabled(section.disabled)
                .overflow_auto(section.overflow_auto);
            spec.variant = section.variant;
            orchestrator.register(spec)?;
        }

        orchestrator.observe(Geometry::new(0.0, self.viewport_height));
        orchestrator.mount()?;
        Ok(orchestrator)
    }

    pub fn run(&self, scroller: &ScrollerConfig, visibility: &VisibilityConfig) -> Result<TraceReport> {
        let log = EventLog::new();
        let mut orchestrator = self.orchestrator(scroller, visibility, log.clone())?;
        let mut dispositions = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let outcome = match step {
                TraceStep::Input(event) => StepOutcome::from(orchestrator.handle(event)),
                TraceStep::Tick { at_ms } => match orchestrator.tick(*at_ms) {
                    Some(index) => StepOutcome::Committed { index },
                    None => StepOutcome::Idle,
                },
                TraceStep::SectionScroll { section, scroll_top } => {
                    if let Some(id) = orchestrator.registry().at(*section).map(|s| s.id) {
                        orchestrator.on_section_scroll(id, *scroll_top)?;
                    }
                    StepOutcome::Idle
                }
                TraceStep::Observe { top } => {
                    match orchestrator.observe(Geometry::new(*top, self.viewport_height)) {
                        Some(index) => StepOutcome::Committed { index },
                        None => StepOutcome::Idle,
                    }
                }
            };
            tracing::trace!(?step, ?outcome, "Trace step");
            dispositions.push(outcome);
        }

        Ok(TraceReport {
            events: log.events(),
            dispositions,
            final_index: orchestrator.current_index(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHEEL_TRACE: &str = r#"{
        "sections": [{}, {}, {"variant": "dark"}],
        "steps": [
            {"input": {"kind": "wheel", "delta_y": 120, "at_ms": 0}},
            {"input": {"kind": "wheel", "delta_y": 120, "at_ms": 50}},
            {"tick": {"at_ms": 500}},
            {"input": {"kind": "wheel", "delta_y": 120, "at_ms": 600}},
            {"tick": {"at_ms": 1100}}
        ]
    }"#;

    #[test]
    fn test_replay_wheel_trace() {
        let trace = Trace::parse(WHEEL_TRACE).unwrap();
        let report = trace
            .run(&ScrollerConfig::default(), &VisibilityConfig::default())
            .unwrap();

        assert_eq!(
            report.dispositions,
            vec![
                StepOutcome::TransitionStarted { from: 0, to: 1 },
                StepOutcome::Ignored,
                StepOutcome::Committed { index: 1 },
                StepOutcome::TransitionStarted { from: 1, to: 2 },
                StepOutcome::Committed { index: 2 },
            ]
        );
        assert_eq!(report.final_index, 2);
        assert_eq!(
            report.events.last(),
            Some(&ScrollEvent::VariantChanged {
                variant: VisualVariant::Dark
            })
        );
    }

    #[test]
    fn test_replay_native_trace() {
        let trace = Trace {
            viewport_height: 100.0,
            sections: Vec::new(),
            steps: vec![
                TraceStep::Observe { top: 40.0 },
                TraceStep::Observe { top: 60.0 },
                TraceStep::Observe { top: 250.0 },
            ],
        }
        .with_content_heights(&[100.0, 100.0, 100.0]);

        let scroller = ScrollerConfig {
            use_native_scroll: true,
            ..Default::default()
        };
        let report = trace.run(&scroller, &VisibilityConfig::default()).unwrap();
        assert_eq!(
            report.dispositions,
            vec![
                StepOutcome::Idle,
                StepOutcome::Committed { index: 1 },
                StepOutcome::Committed { index: 2 },
            ]
        );
    }

    #[test]
    fn test_deck_supplies_markers() {
        let deck = Deck::parse(
            r#"
            [[section]]
            title = "One"
            variant = "light"

            [[section]]
            title = "Two"
            disabled = true
            "#,
        )
        .unwrap();
        let trace = Trace::parse(
            r#"{"steps": [{"input": {"kind": "key", "key": "ArrowDown", "at_ms": 0}}]}"#,
        )
        .unwrap()
        .with_deck(&deck);

        assert_eq!(trace.sections.len(), 2);
        assert!(trace.sections[1].disabled);
        let report = trace
            .run(&ScrollerConfig::default(), &VisibilityConfig::default())
            .unwrap();
        assert_eq!(report.dispositions, vec![StepOutcome::Rejected]);
        assert_eq!(report.final_index, 0);
    }

    #[test]
    fn test_bad_trace_is_json_error() {
        assert!(matches!(Trace::parse("{\"steps\": 3}"), Err(crate::Error::Json(_))));
    }
}
