pub mod app;
pub mod content;
pub mod event;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::{frame_layout, DeckApp, FrameLayout};
pub use theme::Theme;
