use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use scrollstage_core::animator::{spawn_deferred_commit, ScrollerConfigExt, SmoothScroller, TransitionTicket};
use scrollstage_core::section::stack_layout;
use scrollstage_core::{
    AppConfig, Deck, Disposition, Geometry, InputEvent, NavKey, Orchestrator, Result, ScrollCoordinator,
    ScrollEvent, ScrollMode, SectionId, SectionSpec,
};

use crate::content::{SectionContent, CAROUSEL_HEIGHT};
use crate::input::Action;
use crate::theme::Theme;

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub header: Rect,
    pub body: Rect,
    pub progress: Rect,
    pub status: Rect,
}

/// Split the terminal into header, body, progress column and status bar
pub fn frame_layout(area: Rect) -> FrameLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(rows[1]);

    FrameLayout {
        header: rows[0],
        body: columns[0],
        progress: columns[1],
        status: rows[2],
    }
}

/// Width available to section text inside the body
fn text_width(body: Rect) -> u16 {
    body.width.saturating_sub(4).max(1)
}

/// Visible part of one section in the body, in body-relative rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub index: usize,
    pub y: u16,
    pub height: u16,
    /// First content row shown
    pub scroll: u16,
}

/// Clip a section occupying `[top, top + height)` to a viewport of `viewport` rows
fn clip(index: usize, top: i64, height: i64, viewport: i64, inner: u16) -> Option<Slice> {
    let visible_top = top.max(0);
    let visible_bottom = (top + height).min(viewport);
    if visible_bottom <= visible_top {
        return None;
    }
    Some(Slice {
        index,
        y: visible_top as u16,
        height: (visible_bottom - visible_top) as u16,
        scroll: inner.saturating_add((visible_top - top) as u16),
    })
}

#[derive(Debug, Clone, Copy)]
struct DragPoint {
    column: u16,
    row: u16,
    in_carousel: bool,
}

/// State of the deck viewer
pub struct DeckApp {
    pub config: Arc<AppConfig>,
    pub deck: Deck,
    pub orchestrator: Orchestrator,
    pub ids: Vec<SectionId>,
    pub contents: Vec<SectionContent>,
    /// Selected item of each section's carousel
    pub carousel: Vec<usize>,
    /// Section and screen area of the carousel strip drawn last frame
    pub carousel_area: Option<(usize, Rect)>,
    /// Container offset in native mode
    pub smooth: SmoothScroller,
    pub body: Rect,
    pub current_index: usize,
    pub theme: Theme,
    pub status_message: Option<String>,
    pub should_quit: bool,
    events: mpsc::UnboundedReceiver<ScrollEvent>,
    commit_tx: mpsc::UnboundedSender<TransitionTicket>,
    commit_rx: mpsc::UnboundedReceiver<TransitionTicket>,
    drag: Option<DragPoint>,
    started: Instant,
}

impl DeckApp {
    /// Lay out the deck for `body` and mount its sections
    pub fn new(config: Arc<AppConfig>, deck: Deck, body: Rect) -> Result<Self> {
        let coordinator = ScrollCoordinator::new();
        let (event_tx, events) = mpsc::unbounded_channel();
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();

        let mut orchestrator = Orchestrator::new(
            0,
            &config.scroller,
            &config.visibility,
            coordinator.clone(),
            Box::new(event_tx),
        );

        let contents: Vec<SectionContent> = deck
            .sections
            .iter()
            .map(|section| SectionContent::layout(section, text_width(body)))
            .collect();
        let heights: Vec<f32> = contents.iter().map(|c| c.height() as f32).collect();
        let layout = stack_layout(&heights, body.height as f32);

        let mut ids = Vec::with_capacity(contents.len());
        for (section, (extent, geometry)) in deck.sections.iter().zip(layout) {
            let spec: SectionSpec = section.spec().with_extent(extent).with_geometry(geometry);
            ids.push(orchestrator.register(spec)?);
        }
        orchestrator.observe(Geometry::new(0.0, body.height as f32));
        orchestrator.mount()?;

        let mut app = Self {
            smooth: SmoothScroller::new(config.ui.scroll.clone(), coordinator),
            carousel: vec![0; contents.len()],
            config,
            deck,
            orchestrator,
            ids,
            contents,
            carousel_area: None,
            body,
            current_index: 0,
            theme: Theme::default(),
            status_message: None,
            should_quit: false,
            events,
            commit_tx,
            commit_rx,
            drag: None,
            started: Instant::now(),
        };
        app.drain_events();
        Ok(app)
    }

    /// Milliseconds since the app started
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn section_count(&self) -> usize {
        self.contents.len()
    }

    pub fn mode(&self) -> ScrollMode {
        self.orchestrator.mode()
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.orchestrator.is_transitioning() || self.smooth.needs_update()
    }

    /// Re-wrap and re-measure every section for a new body size
    pub fn relayout(&mut self, body: Rect) -> Result<()> {
        self.body = body;
        self.contents = self
            .deck
            .sections
            .iter()
            .map(|section| SectionContent::layout(section, text_width(body)))
            .collect();
        let heights: Vec<f32> = self.contents.iter().map(|c| c.height() as f32).collect();

        let layout = stack_layout(&heights, body.height as f32);
        for (id, (mut extent, geometry)) in self.ids.clone().into_iter().zip(layout) {
            if let Some(section) = self.orchestrator.registry().get(id) {
                extent.scroll_top = section.extent.scroll_top.min(extent.max_scroll_top());
            }
            self.orchestrator.on_resize(id, extent, geometry)?;
        }
        debug!(width = body.width, height = body.height, "Deck re-laid out");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame updates
    // ------------------------------------------------------------------

    pub fn update(&mut self) {
        let now = self.now_ms();
        self.update_at(now);
    }

    /// Commit finished transitions, advance smooth scrolling and collect
    /// notifications
    pub fn update_at(&mut self, now_ms: u64) {
        while let Ok(ticket) = self.commit_rx.try_recv() {
            self.orchestrator.complete(ticket);
        }
        self.orchestrator.tick(now_ms);

        if self.mode() == ScrollMode::Native {
            let max = self.max_container_scroll();
            let top = self.smooth.update(max, now_ms);
            self.orchestrator
                .observe(Geometry::new(top as f32, self.body.height as f32));
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ScrollEvent::IndexChanged { index, total } => {
                    trace!(index, total, "Active section changed");
                    self.current_index = index;
                }
                ScrollEvent::VariantChanged { variant } => {
                    self.theme = Theme::for_variant(variant);
                }
            }
        }
    }

    /// Largest container offset in native mode
    pub fn max_container_scroll(&self) -> u16 {
        let total = self
            .orchestrator
            .registry()
            .iter()
            .map(|s| s.geometry.bottom())
            .fold(0.0_f32, f32::max);
        (total - self.body.height as f32).max(0.0) as u16
    }

    /// Visible section slices for this frame; also records the carousel hit area
    pub fn slices_at(&mut self, now_ms: u64) -> Vec<Slice> {
        let viewport = self.body.height as i64;
        let registry = self.orchestrator.registry();

        let slices: Vec<Slice> = match self.orchestrator.mode() {
            ScrollMode::Paged => {
                let offset = self.orchestrator.position(now_ms) * viewport as f64;
                registry
                    .iter()
                    .enumerate()
                    .filter_map(|(index, section)| {
                        let top = (index as f64 * viewport as f64 - offset).round() as i64;
                        clip(index, top, viewport, viewport, section.extent.scroll_top as u16)
                    })
                    .collect()
            }
            ScrollMode::Native => {
                let scroll = self.smooth.current_scroll() as i64;
                registry
                    .iter()
                    .enumerate()
                    .filter_map(|(index, section)| {
                        let top = section.geometry.top as i64 - scroll;
                        clip(index, top, section.geometry.height as i64, viewport, 0)
                    })
                    .collect()
            }
        };

        self.carousel_area = slices.iter().find_map(|slice| {
            let row = self.contents.get(slice.index)?.carousel_row()?;
            let start = row.max(slice.scroll);
            let end = (row + CAROUSEL_HEIGHT).min(slice.scroll + slice.height);
            (end > start).then(|| {
                (
                    slice.index,
                    Rect::new(
                        self.body.x,
                        self.body.y + slice.y + (start - slice.scroll),
                        self.body.width,
                        end - start,
                    ),
                )
            })
        });
        slices
    }

    fn in_carousel(&self, column: u16, row: u16) -> bool {
        self.carousel_area.map_or(false, |(_, area)| {
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
        })
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        let now = self.now_ms();
        self.handle_action_at(action, now)
    }

    pub fn handle_action_at(&mut self, action: Action, now_ms: u64) -> Result<()> {
        let lines = self.config.ui.scroll.scroll_lines as i32;

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleMode => self.toggle_mode(),
            Action::Nav(key) => {
                let down = key == NavKey::ArrowDown;
                match self.dispatch(InputEvent::key(key, now_ms)) {
                    // Arrow keys scroll whatever is scrollable when no transition fits
                    Disposition::Ignored | Disposition::ConsumedLocally => match self.mode() {
                        ScrollMode::Paged => self.scroll_natively(if down { 1 } else { -1 })?,
                        ScrollMode::Native => {
                            let max = self.max_container_scroll();
                            if down {
                                self.smooth.scroll_down(max);
                            } else {
                                self.smooth.scroll_up(max);
                            }
                        }
                    },
                    _ => {}
                }
            }
            Action::PageDown | Action::PageUp => {
                let down = action == Action::PageDown;
                match self.mode() {
                    ScrollMode::Native => {
                        let max = self.max_container_scroll();
                        self.smooth.scroll_page(down, self.body.height, max);
                    }
                    ScrollMode::Paged => {
                        let key = if down { NavKey::ArrowDown } else { NavKey::ArrowUp };
                        self.dispatch(InputEvent::key(key, now_ms));
                    }
                }
            }
            Action::JumpToTop | Action::JumpToBottom => self.jump_to_edge(action == Action::JumpToBottom, now_ms)?,
            Action::CarouselPrev => self.step_carousel(self.current_index, -1),
            Action::CarouselNext => self.step_carousel(self.current_index, 1),
            Action::Wheel {
                delta_y,
                ctrl,
                column,
                row,
            } => {
                let in_carousel = self.in_carousel(column, row);
                let disposition = self.dispatch(InputEvent::Wheel {
                    delta_y,
                    ctrl,
                    meta: false,
                    in_alt_container: in_carousel,
                    at_ms: now_ms,
                });
                let step = if delta_y > 0.0 { lines } else { -lines };
                match disposition {
                    Disposition::ConsumedLocally => self.scroll_inner(step)?,
                    Disposition::Ignored if ctrl => {}
                    Disposition::Ignored if in_carousel => {
                        if let Some((index, _)) = self.carousel_area {
                            self.step_carousel(index, step.signum() as isize);
                        }
                    }
                    Disposition::Ignored => self.scroll_natively(step)?,
                    _ => {}
                }
            }
            Action::Press { column, row } => {
                self.drag = Some(DragPoint {
                    column,
                    row,
                    in_carousel: self.in_carousel(column, row),
                });
                self.dispatch(InputEvent::touch_start(column as f32, row as f32, now_ms));
            }
            Action::Drag { column, row } => {
                let Some(previous) = self.drag else {
                    return Ok(());
                };
                let disposition = self.dispatch(InputEvent::TouchMove {
                    x: column as f32,
                    y: row as f32,
                    in_horizontal_area: previous.in_carousel,
                    at_ms: now_ms,
                });
                // Finger up moves content up
                let dy = previous.row as i32 - row as i32;
                let dx = column as i32 - previous.column as i32;
                match disposition {
                    Disposition::ConsumedLocally => self.scroll_inner(dy)?,
                    Disposition::Ignored if previous.in_carousel && dx.abs() > dy.abs() => {
                        if let Some((index, _)) = self.carousel_area {
                            self.step_carousel(index, -(dx.signum() as isize));
                        }
                    }
                    Disposition::Ignored => self.scroll_natively(dy)?,
                    _ => {}
                }
                self.drag = Some(DragPoint {
                    column,
                    row,
                    ..previous
                });
            }
            Action::Release => {
                self.drag = None;
                self.dispatch(InputEvent::TouchEnd { at_ms: now_ms });
            }
            Action::None => {}
        }
        Ok(())
    }

    /// Feed one event to the orchestrator and schedule its commit
    fn dispatch(&mut self, event: InputEvent) -> Disposition {
        let disposition = self.orchestrator.handle(&event);
        trace!(?event, ?disposition, "Input handled");

        if let Disposition::TransitionStarted(ticket) = disposition {
            spawn_deferred_commit(
                ticket,
                self.config.scroller.transition_duration(),
                self.orchestrator.liveness(),
                self.commit_tx.clone(),
            );
            self.status_message = None;
        }
        disposition
    }

    /// Host fallback for input the orchestrator left alone
    fn scroll_natively(&mut self, rows: i32) -> Result<()> {
        match self.mode() {
            ScrollMode::Paged if self.orchestrator.is_transitioning() => Ok(()),
            ScrollMode::Paged => self.scroll_inner(rows),
            ScrollMode::Native => {
                let max = self.max_container_scroll();
                self.smooth.scroll_by(rows, max);
                Ok(())
            }
        }
    }

    /// Home / End: the whole deck in native mode, the active section's
    /// content in paged mode
    fn jump_to_edge(&mut self, bottom: bool, now_ms: u64) -> Result<()> {
        match self.mode() {
            ScrollMode::Native => {
                let max = self.max_container_scroll();
                self.smooth.scroll_to(if bottom { max } else { 0 }, max, now_ms);
                Ok(())
            }
            ScrollMode::Paged => {
                if self.orchestrator.is_transitioning() {
                    return Ok(());
                }
                let Some(section) = self.orchestrator.active_section() else {
                    return Ok(());
                };
                if !section.has_inner_overflow() {
                    return Ok(());
                }
                let top = if bottom { section.extent.max_scroll_top() } else { 0.0 };
                let id = section.id;
                self.orchestrator.on_section_scroll(id, top)
            }
        }
    }

    /// Scroll the active section's own content
    fn scroll_inner(&mut self, rows: i32) -> Result<()> {
        let Some(section) = self.orchestrator.active_section() else {
            return Ok(());
        };
        if !section.has_inner_overflow() {
            return Ok(());
        }
        let (id, top) = (section.id, section.extent.scroll_top);
        self.orchestrator.on_section_scroll(id, top + rows as f32)
    }

    fn step_carousel(&mut self, index: usize, step: isize) {
        let Some(content) = self.contents.get(index) else {
            return;
        };
        let len = content.carousel.len();
        if len == 0 {
            return;
        }
        if let Some(selected) = self.carousel.get_mut(index) {
            *selected = (*selected as isize + step).clamp(0, len as isize - 1) as usize;
        }
    }

    fn toggle_mode(&mut self) {
        let switched = match self.mode() {
            ScrollMode::Paged => {
                let top = self
                    .orchestrator
                    .active_section()
                    .map_or(0.0, |s| s.geometry.top);
                // Measure from where the page currently is before reporting
                self.orchestrator
                    .observe(Geometry::new(top, self.body.height as f32));
                let switched = self.orchestrator.set_mode(ScrollMode::Native);
                if switched {
                    self.smooth.set_scroll(top as u16);
                }
                switched
            }
            ScrollMode::Native => {
                self.smooth.release();
                self.orchestrator.set_mode(ScrollMode::Paged)
            }
        };

        self.status_message = Some(if switched {
            match self.mode() {
                ScrollMode::Paged => "Paged scrolling".to_string(),
                ScrollMode::Native => "Native scrolling".to_string(),
            }
        } else {
            "Transition in progress".to_string()
        });
        self.drain_events();
    }
}
