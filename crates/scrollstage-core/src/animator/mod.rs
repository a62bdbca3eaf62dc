//! Animation for the section scroller
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, quintic, exponential, ease-in-out)
//! - `timing` - Time calculation utilities (progress, interpolation)
//! - `config` - Duration helpers over the configuration types
//!
//! ## L3 Molecular Layer
//! - `transition` - Fixed-duration section transitions with single commit
//! - `smooth` - Eased continuous scrolling for native scroll mode

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod smooth;
pub mod transition;

pub use config::{ScrollerConfigExt, SmoothScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
pub use smooth::SmoothScroller;
pub use transition::{spawn_deferred_commit, Liveness, TransitionAnimator, TransitionTicket};
