pub mod animator;
pub mod config;
pub mod coordinator;
pub mod deck;
pub mod delegate;
pub mod error;
pub mod gesture;
pub mod listener;
pub mod machine;
pub mod orchestrator;
pub mod section;
pub mod trace;
pub mod visibility;

pub use config::{AppConfig, EasingType, ScrollerConfig, SmoothScrollConfig, VisibilityConfig};
pub use coordinator::{ScrollCoordinator, ScrollDriver};
pub use deck::{Deck, DeckSection};
pub use error::{Error, Result};
pub use gesture::{InputEvent, Intent, NavKey};
pub use listener::{EventLog, ScrollEvent, ScrollListener};
pub use orchestrator::{Disposition, Orchestrator, ScrollMode};
pub use section::{Geometry, ScrollExtent, SectionId, SectionSpec, VisualVariant};

#[cfg(test)]
mod scenarios;
