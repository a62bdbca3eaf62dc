//! L3 Molecular Layer: Section transition animator
//!
//! Moves the section stack from one index to another over a fixed duration.
//! The stack offset during the animation is `-position * 100%` where
//! `position` eases from the source index to the target. Each accepted
//! transition yields one [`TransitionTicket`] and is finished exactly once,
//! either by polling [`TransitionAnimator::due`] or through a deferred
//! commit scheduled with [`spawn_deferred_commit`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress};
use crate::config::ScrollerConfig;

/// Identifies one accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket {
    pub generation: u64,
    pub from: usize,
    pub to: usize,
}

/// Shared flag that goes false when the owning container unmounts
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
struct ActiveTransition {
    ticket: TransitionTicket,
    start_ms: u64,
}

#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    active: Option<ActiveTransition>,
    duration_ms: u64,
    easing: EasingType,
    generation: u64,
    /// Index the stack rests at when idle
    resting: usize,
}

impl Default for TransitionAnimator {
    fn default() -> Self {
        Self::new(&ScrollerConfig::default())
    }
}

impl TransitionAnimator {
    pub fn new(config: &ScrollerConfig) -> Self {
        Self {
            active: None,
            duration_ms: config.transition_duration_ms,
            easing: config.easing,
            generation: 0,
            resting: 0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Place the stack at an index without animating
    pub fn rest_at(&mut self, index: usize) {
        self.active = None;
        self.resting = index;
    }

    /// Start animating; `None` when a transition is already running
    pub fn animate(&mut self, from: usize, to: usize, now_ms: u64) -> Option<TransitionTicket> {
        if self.active.is_some() {
            return None;
        }
        self.generation += 1;
        let ticket = TransitionTicket {
            generation: self.generation,
            from,
            to,
        };
        self.active = Some(ActiveTransition {
            ticket,
            start_ms: now_ms,
        });
        tracing::debug!(from, to, generation = ticket.generation, "Section transition started");
        Some(ticket)
    }

    /// Stack position in sections at `now_ms`
    pub fn position(&self, now_ms: u64) -> f64 {
        match &self.active {
            Some(active) => {
                let t = progress(active.start_ms, now_ms, self.duration_ms);
                lerp(
                    active.ticket.from as f64,
                    active.ticket.to as f64,
                    self.easing.apply(t),
                )
            }
            None => self.resting as f64,
        }
    }

    /// Translation of the section stack, in percent of one section
    pub fn offset_percent(&self, now_ms: u64) -> f64 {
        -self.position(now_ms) * 100.0
    }

    /// Ticket of the running transition once its duration has elapsed
    pub fn due(&self, now_ms: u64) -> Option<TransitionTicket> {
        self.active
            .as_ref()
            .filter(|a| is_complete(a.start_ms, now_ms, self.duration_ms))
            .map(|a| a.ticket)
    }

    /// Finish the transition named by `ticket`. Returns false for stale or
    /// already finished tickets.
    pub fn finish(&mut self, ticket: TransitionTicket) -> bool {
        match &self.active {
            Some(active) if active.ticket == ticket => {
                self.active = None;
                self.resting = ticket.to;
                true
            }
            _ => false,
        }
    }
}

/// Deliver `ticket` on `tx` after `delay`, unless the container died meanwhile
pub fn spawn_deferred_commit(
    ticket: TransitionTicket,
    delay: Duration,
    liveness: Liveness,
    tx: mpsc::UnboundedSender<TransitionTicket>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if liveness.is_alive() {
            let _ = tx.send(ticket);
        } else {
            tracing::debug!(generation = ticket.generation, "Dropping commit for unmounted container");
        }
    })
}
