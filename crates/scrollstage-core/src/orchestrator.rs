//! Section orchestrator
//!
//! Composes the gesture normalizer, inner-scroll delegate, state machine,
//! transition animator and visibility reporter behind one entry point. Hosts
//! register sections, mount, then feed [`InputEvent`]s and geometry updates;
//! every event gets a [`Disposition`] back telling the host what to do with
//! it natively.

use tracing::{debug, trace, warn};

use crate::animator::{Liveness, TransitionAnimator, TransitionTicket};
use crate::config::{ScrollerConfig, VisibilityConfig};
use crate::coordinator::{ScrollCoordinator, ScrollDriver};
use crate::delegate::{Delegation, InnerScrollDelegate};
use crate::gesture::{GestureNormalizer, InputEvent, Intent};
use crate::listener::ScrollListener;
use crate::machine::{Rejection, SectionStateMachine};
use crate::section::{Geometry, ScrollExtent, Section, SectionId, SectionRegistry, SectionSpec, VisualVariant};
use crate::visibility::VisibilityReporter;
use crate::{Error, Result};

/// Display mode of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Paginated transitions driven by the state machine
    Paged,
    /// Continuous scrolling; the visibility reporter tracks the index
    Native,
}

/// What the host should do with an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Not handled; the host may apply its native behaviour
    Ignored,
    /// The active section should scroll its own content
    ConsumedLocally,
    /// Swallowed as a policy rejection
    Rejected,
    TransitionStarted(TransitionTicket),
}

pub struct Orchestrator {
    registry: SectionRegistry,
    config: ScrollerConfig,
    normalizer: GestureNormalizer,
    delegate: InnerScrollDelegate,
    machine: Option<SectionStateMachine>,
    animator: TransitionAnimator,
    reporter: VisibilityReporter,
    coordinator: ScrollCoordinator,
    listener: Box<dyn ScrollListener>,
    liveness: Liveness,
    mode: ScrollMode,
    viewport: Geometry,
    announced_variant: Option<VisualVariant>,
}

impl Orchestrator {
    pub fn new(
        arena: u32,
        config: &ScrollerConfig,
        visibility: &VisibilityConfig,
        coordinator: ScrollCoordinator,
        listener: Box<dyn ScrollListener>,
    ) -> Self {
        Self {
            registry: SectionRegistry::new(arena),
            config: config.clone(),
            normalizer: GestureNormalizer::new(config),
            delegate: InnerScrollDelegate::new(config.overflow_tolerance),
            machine: None,
            animator: TransitionAnimator::new(config),
            reporter: VisibilityReporter::new(visibility),
            coordinator,
            listener,
            liveness: Liveness::new(),
            mode: if config.use_native_scroll {
                ScrollMode::Native
            } else {
                ScrollMode::Paged
            },
            viewport: Geometry::default(),
            announced_variant: None,
        }
    }

    fn driver(&self) -> ScrollDriver {
        ScrollDriver::PageScroller {
            arena: self.registry.arena(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Register the next section in display order
    pub fn register(&mut self, spec: SectionSpec) -> Result<SectionId> {
        if self.machine.is_some() || !self.liveness.is_alive() {
            return Err(Error::AlreadyMounted);
        }
        Ok(self.registry.register(spec))
    }

    /// Remove a section. After mount this tears the container down, since the
    /// section count is fixed for the container's lifetime.
    pub fn deregister(&mut self, id: SectionId) -> Result<()> {
        self.registry.deregister(id)?;
        if self.machine.is_some() {
            warn!(section = %id, "Section removed from a mounted container, unmounting");
            self.unmount();
        }
        Ok(())
    }

    /// Freeze the section list and start orchestrating
    pub fn mount(&mut self) -> Result<()> {
        if self.machine.is_some() || !self.liveness.is_alive() {
            return Err(Error::AlreadyMounted);
        }
        if self.registry.is_empty() {
            return Err(Error::EmptyDeck);
        }

        self.machine = Some(SectionStateMachine::new(
            &self.registry,
            &self.delegate,
            self.config.scrollable,
        ));
        self.animator.rest_at(0);
        debug!(sections = self.registry.len(), mode = ?self.mode, "Section container mounted");

        match self.mode {
            ScrollMode::Paged => {
                if !self.coordinator.claim(self.driver()) {
                    warn!(holder = ?self.coordinator.holder(), "Scroll position already driven elsewhere");
                }
                self.announce(0);
            }
            ScrollMode::Native => {
                self.observe(self.viewport);
            }
        }
        Ok(())
    }

    /// Tear down. Pending commits become no-ops.
    pub fn unmount(&mut self) {
        if !self.liveness.is_alive() {
            return;
        }
        self.liveness.kill();
        self.coordinator.release(self.driver());
        if self.animator.is_animating() {
            debug!("Pending transition dropped");
            self.animator.rest_at(self.current_index());
        }
        self.machine = None;
        debug!("Section container unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.machine.is_some() && self.liveness.is_alive()
    }

    /// Handle for deferred work that must not outlive the container
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn section_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &ScrollCoordinator {
        &self.coordinator
    }

    /// Active index: the state machine's in paged mode, the last visibility
    /// report in native mode
    pub fn current_index(&self) -> usize {
        match self.mode {
            ScrollMode::Paged => self.machine.as_ref().map_or(0, |m| m.current_index()),
            ScrollMode::Native => self.reporter.current().unwrap_or(0),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.machine.as_ref().map_or(false, |m| m.state().can_advance)
    }

    pub fn can_retreat(&self) -> bool {
        self.machine.as_ref().map_or(false, |m| m.state().can_retreat)
    }

    pub fn is_transitioning(&self) -> bool {
        self.machine.as_ref().map_or(false, |m| m.is_transitioning())
    }

    pub fn machine(&self) -> Option<&SectionStateMachine> {
        self.machine.as_ref()
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.registry.at(self.current_index())
    }

    /// Stack position in sections, for rendering the paged transform
    pub fn position(&self, now_ms: u64) -> f64 {
        self.animator.position(now_ms)
    }

    pub fn offset_percent(&self, now_ms: u64) -> f64 {
        self.animator.offset_percent(now_ms)
    }

    pub fn transition_duration_ms(&self) -> u64 {
        self.config.transition_duration_ms
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle(&mut self, event: &InputEvent) -> Disposition {
        let at_ms = event.at_ms();
        self.tick(at_ms);

        if !self.is_mounted() || self.mode == ScrollMode::Native {
            return Disposition::Ignored;
        }
        let Some(machine) = self.machine.as_mut() else {
            return Disposition::Ignored;
        };

        let intent = match *event {
            InputEvent::Wheel {
                delta_y,
                ctrl,
                meta,
                in_alt_container,
                ..
            } => self.normalizer.classify_wheel(
                delta_y,
                ctrl || meta,
                in_alt_container,
                at_ms,
                machine.state().last_transition_at,
            ),
            InputEvent::TouchStart { x, y, .. } => {
                *machine.touch_mut() = self.normalizer.touch_start(x, y);
                return Disposition::Ignored;
            }
            InputEvent::TouchMove {
                x,
                y,
                in_horizontal_area,
                ..
            } => {
                let outcome =
                    self.normalizer
                        .classify_touch_move(&machine.state().touch, x, y, in_horizontal_area);
                machine.touch_mut().anchor = outcome.anchor;
                outcome.intent
            }
            InputEvent::TouchEnd { .. } => {
                *machine.touch_mut() = Default::default();
                return Disposition::Ignored;
            }
            InputEvent::Key { key, .. } => self.normalizer.classify_key(key, machine.state().key_context()),
        };

        if intent == Intent::Ignore {
            return Disposition::Ignored;
        }
        trace!(kind = ?event.kind(), ?intent, at_ms, "Gesture classified");
        self.request(intent, at_ms)
    }

    fn request(&mut self, intent: Intent, at_ms: u64) -> Disposition {
        let Some(machine) = self.machine.as_mut() else {
            return Disposition::Ignored;
        };

        if let Some(active) = machine.active(&self.registry) {
            if self.delegate.decide(active, intent, machine.is_transitioning()) == Delegation::ConsumeLocally {
                trace!(?intent, section = %active.id, "Intent consumed by inner scroll");
                return Disposition::ConsumedLocally;
            }
        }

        match machine.request(intent, &self.registry, at_ms) {
            Ok((from, to)) => match self.animator.animate(from, to, at_ms) {
                Some(ticket) => Disposition::TransitionStarted(ticket),
                None => Disposition::Rejected,
            },
            // Transitions are off; the host scrolls as it would natively
            Err(Rejection::NotScrollable) => Disposition::Ignored,
            Err(reason) => {
                trace!(?intent, %reason, "Transition rejected");
                Disposition::Rejected
            }
        }
    }

    /// Advance time. Commits a transition whose duration has elapsed and
    /// returns the committed index.
    pub fn tick(&mut self, now_ms: u64) -> Option<usize> {
        let ticket = self.animator.due(now_ms)?;
        self.complete(ticket).then_some(ticket.to)
    }

    /// Commit a finished transition. Stale, duplicate or post-unmount tickets
    /// are ignored.
    pub fn complete(&mut self, ticket: TransitionTicket) -> bool {
        if !self.liveness.is_alive() {
            debug!(generation = ticket.generation, "Commit after unmount ignored");
            return false;
        }
        let Some(machine) = self.machine.as_mut() else {
            return false;
        };
        if !self.animator.finish(ticket) {
            return false;
        }
        if !machine.commit(ticket.to, &self.registry, &self.delegate) {
            return false;
        }

        debug!(from = ticket.from, to = ticket.to, "Section transition committed");
        self.announce(ticket.to);
        true
    }

    // ------------------------------------------------------------------
    // Section updates
    // ------------------------------------------------------------------

    /// The section's own content scrolled
    pub fn on_section_scroll(&mut self, id: SectionId, scroll_top: f32) -> Result<()> {
        let section = self.registry.get_mut(id).ok_or(Error::UnknownSection(id))?;
        section.extent.scroll_top = scroll_top.clamp(0.0, section.extent.max_scroll_top());
        self.refresh_flags();
        Ok(())
    }

    /// Re-measure a section after a resize
    pub fn on_resize(&mut self, id: SectionId, extent: ScrollExtent, geometry: Geometry) -> Result<()> {
        let section = self.registry.get_mut(id).ok_or(Error::UnknownSection(id))?;
        section.extent = extent;
        section.geometry = geometry;
        self.refresh_flags();
        Ok(())
    }

    pub fn set_disabled(&mut self, id: SectionId, disabled: bool) -> Result<()> {
        let section = self.registry.get_mut(id).ok_or(Error::UnknownSection(id))?;
        section.disabled = disabled;
        Ok(())
    }

    fn refresh_flags(&mut self) {
        if let Some(machine) = self.machine.as_mut() {
            if !machine.is_transitioning() {
                machine.refresh_flags(&self.registry, &self.delegate);
            }
        }
    }

    // ------------------------------------------------------------------
    // Native scroll mode
    // ------------------------------------------------------------------

    /// Report the most visible section for the given container viewport.
    /// Returns the index when it changed.
    pub fn observe(&mut self, viewport: Geometry) -> Option<usize> {
        self.viewport = viewport;
        if !self.is_mounted() || self.mode != ScrollMode::Native {
            return None;
        }
        let geometries: Vec<Geometry> = self.registry.iter().map(|s| s.geometry).collect();
        let index = self.reporter.observe(geometries, viewport)?;
        self.announce(index);
        Some(index)
    }

    /// Switch between paged and native scrolling
    ///
    /// Entering paged mode lands on the section last reported visible;
    /// entering native mode reports afresh from the stored viewport.
    pub fn set_mode(&mut self, mode: ScrollMode) -> bool {
        if mode == self.mode || self.is_transitioning() {
            return false;
        }
        self.mode = mode;
        self.config.use_native_scroll = mode == ScrollMode::Native;
        if !self.is_mounted() {
            return true;
        }

        match mode {
            ScrollMode::Paged => {
                let index = self.reporter.current().unwrap_or(0);
                if let Some(machine) = self.machine.as_mut() {
                    machine.jump_to(index, &self.registry, &self.delegate);
                }
                self.animator.rest_at(index);
                self.coordinator.claim(self.driver());
            }
            ScrollMode::Native => {
                self.coordinator.release(self.driver());
                self.reporter.reset();
                self.observe(self.viewport);
            }
        }
        debug!(?mode, "Scroll mode switched");
        true
    }

    /// Globally allow or forbid transitions
    pub fn set_scrollable(&mut self, scrollable: bool) {
        self.config.scrollable = scrollable;
        if let Some(machine) = self.machine.as_mut() {
            machine.set_scrollable(scrollable);
        }
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn announce(&mut self, index: usize) {
        self.listener.on_index_change(index, self.registry.len());

        let variant = self.registry.at(index).and_then(|s| s.variant);
        if let Some(variant) = variant {
            if self.announced_variant != Some(variant) {
                self.announced_variant = Some(variant);
                self.listener.on_visual_variant_change(variant);
            }
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("mode", &self.mode)
            .field("sections", &self.registry.len())
            .field("machine", &self.machine)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
