use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::info;

use scrollstage_core::animator::SmoothScrollConfigExt;
use scrollstage_core::{AppConfig, Deck};
use scrollstage_tui::{
    app::DeckApp,
    event::{AppEvent, EventHandler},
    frame_layout,
    input::{handle_key_event, handle_mouse_event, Action},
    widgets::{HeaderWidget, ProgressWidget, SectionWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, deck_path: Option<PathBuf>, native: bool) -> Result<()> {
    let deck = match &deck_path {
        Some(path) => Deck::load(path)?,
        None => Deck::demo(),
    };
    let config = if native && !config.scroller.use_native_scroll {
        let mut config = (*config).clone();
        config.scroller.use_native_scroll = true;
        Arc::new(config)
    } else {
        config
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let title = deck.title.clone().unwrap_or_else(|| "scrollstage".to_string());
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(&title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, config, deck).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
    deck: Deck,
) -> Result<()> {
    let size = terminal.size()?;
    let layout = frame_layout(Rect::new(0, 0, size.width, size.height));

    let mut app = DeckApp::new(config.clone(), deck, layout.body)?;
    info!(
        sections = app.section_count(),
        mode = ?app.mode(),
        "Deck mounted"
    );

    // Create event handler with animation FPS support
    let event_handler =
        EventHandler::with_animation_tick(config.ui.tick_rate_ms, config.ui.scroll.animation_tick_duration());

    // Track if we need high frame rate for transitions and smooth scrolling
    let mut needs_fast_update = false;

    // Main loop
    loop {
        // Commit finished transitions, collect notifications
        app.update();

        // Draw UI
        let now = app.now_ms();
        let slices = app.slices_at(now);
        terminal.draw(|frame| {
            let layout = frame_layout(frame.area());

            HeaderWidget::render(frame, layout.header, &app);
            SectionWidget::render(frame, layout.body, &app, &slices);
            if app.config.ui.show_progress {
                ProgressWidget::render(frame, layout.progress, &app);
            }
            StatusBarWidget::render(frame, layout.status, &app);
        })?;

        // Handle events (use faster tick rate during animations)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key))?,
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse);
                    if action != Action::None {
                        app.handle_action(action)?;
                    }
                }
                AppEvent::Resize(width, height) => {
                    let layout = frame_layout(Rect::new(0, 0, width, height));
                    app.relayout(layout.body)?;
                }
                AppEvent::Tick => {}
            }
        }

        // Update fast update flag for next iteration
        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    info!(section = app.current_index, "Viewer closed");
    Ok(())
}
