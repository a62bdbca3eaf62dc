//! Section index state machine
//!
//! `Idle(index) -> Transitioning(from, to) -> Idle(to)`. At most one
//! transition is in flight; overlapping requests are rejected, never queued.

use std::fmt;

use crate::delegate::InnerScrollDelegate;
use crate::gesture::{Intent, KeyContext, TouchTrack};
use crate::section::{Section, SectionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle { index: usize },
    Transitioning { from: usize, to: usize },
}

/// Mutable scroll state, owned by the state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollState {
    pub current_index: usize,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub is_transitioning: bool,
    /// Touch-start point and last move Y
    pub touch: TouchTrack,
    /// Acceptance time of the last transition; opens the wheel throttle window
    pub last_transition_at: Option<u64>,
}

impl ScrollState {
    /// Last touch Y used for incremental deltas
    pub fn pending_gesture_anchor(&self) -> Option<f32> {
        self.touch.anchor
    }

    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            can_advance: self.can_advance,
            can_retreat: self.can_retreat,
            is_transitioning: self.is_transitioning,
        }
    }
}

/// Why a transition request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotScrollable,
    Busy,
    NoDirection,
    OutOfRange,
    Disabled,
    Blocked,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NotScrollable => "scrolling disabled",
            Rejection::Busy => "transition in flight",
            Rejection::NoDirection => "no direction",
            Rejection::OutOfRange => "target out of range",
            Rejection::Disabled => "section disabled",
            Rejection::Blocked => "direction not allowed",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone)]
pub struct SectionStateMachine {
    state: ScrollState,
    phase: Phase,
    section_count: usize,
    scrollable: bool,
}

impl SectionStateMachine {
    /// Machine resting on the first section
    pub fn new(sections: &SectionRegistry, delegate: &InnerScrollDelegate, scrollable: bool) -> Self {
        let mut machine = Self {
            state: ScrollState::default(),
            phase: Phase::Idle { index: 0 },
            section_count: sections.len(),
            scrollable,
        };
        machine.refresh_flags(sections, delegate);
        machine
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    pub fn set_scrollable(&mut self, scrollable: bool) {
        self.scrollable = scrollable;
    }

    pub fn touch_mut(&mut self) -> &mut TouchTrack {
        &mut self.state.touch
    }

    /// Validate a request and enter `Transitioning` on success
    pub fn request(
        &mut self,
        intent: Intent,
        sections: &SectionRegistry,
        at_ms: u64,
    ) -> Result<(usize, usize), Rejection> {
        if !self.scrollable {
            return Err(Rejection::NotScrollable);
        }
        if self.state.is_transitioning {
            return Err(Rejection::Busy);
        }

        let from = self.state.current_index;
        let step = intent.step();
        if step == 0 {
            return Err(Rejection::NoDirection);
        }
        let to = from as isize + step;
        if to < 0 || to as usize >= self.section_count {
            return Err(Rejection::OutOfRange);
        }
        let to = to as usize;

        let disabled = |index: usize| sections.at(index).map_or(false, |s| s.disabled);
        if disabled(from) || disabled(to) {
            return Err(Rejection::Disabled);
        }

        let allowed = match intent {
            Intent::Advance => self.state.can_advance,
            Intent::Retreat => self.state.can_retreat,
            Intent::Ignore => false,
        };
        if !allowed {
            return Err(Rejection::Blocked);
        }

        self.state.is_transitioning = true;
        self.state.last_transition_at = Some(at_ms);
        self.phase = Phase::Transitioning { from, to };
        Ok((from, to))
    }

    /// Land on the target of the running transition
    pub fn commit(&mut self, to: usize, sections: &SectionRegistry, delegate: &InnerScrollDelegate) -> bool {
        match self.phase {
            Phase::Transitioning { to: target, .. } if target == to => {}
            _ => return false,
        }
        self.state.current_index = to;
        self.state.is_transitioning = false;
        self.state.touch.anchor = None;
        self.phase = Phase::Idle { index: to };
        self.refresh_flags(sections, delegate);
        true
    }

    /// Move to an index without a transition (mode switches)
    pub fn jump_to(&mut self, index: usize, sections: &SectionRegistry, delegate: &InnerScrollDelegate) -> bool {
        if self.state.is_transitioning || index >= self.section_count {
            return false;
        }
        self.state.current_index = index;
        self.state.touch = TouchTrack::default();
        self.phase = Phase::Idle { index };
        self.refresh_flags(sections, delegate);
        true
    }

    /// Recompute can-advance / can-retreat from the active section
    pub fn refresh_flags(&mut self, sections: &SectionRegistry, delegate: &InnerScrollDelegate) {
        let (can_advance, can_retreat) = match sections.at(self.state.current_index) {
            Some(active) => delegate.flags(active, self.state.current_index, self.section_count),
            None => (false, false),
        };
        self.state.can_advance = can_advance;
        self.state.can_retreat = can_retreat;
    }

    /// Active section, if still registered
    pub fn active<'a>(&self, sections: &'a SectionRegistry) -> Option<&'a Section> {
        sections.at(self.state.current_index)
    }
}
