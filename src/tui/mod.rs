//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, draws the thread and
//! turns mouse and keyboard input into scrolling, selection and cell taps.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (typing indicator shown): draws every ~80ms.
//! - **Idle**: sleeps up to 250ms and only redraws on input, resize or a
//!   finished image load.
//!
//! Image results arrive on the loader's channel and are drained with
//! `try_recv` at the top of every loop iteration. New image requests are
//! issued after each draw, for the image areas that draw actually showed.

mod component;
mod components;
mod delegate;
mod event;
pub mod grid;
pub mod theme;

use std::collections::BTreeSet;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::MetricsPreset;
use crate::core::config::ResolvedConfig;
use crate::core::thread::{MessageThread, ThreadSource};
use crate::layout::{
    CalculatorConfig, MessageCellDelegate, MessageSizeCalculator, TapTarget, VerticalAnchor,
    dispatch_tap,
};
use crate::media::{HttpImageFetcher, ImageLoader};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{ThreadView, ThreadViewEvent, ThreadViewState, TitleBar};
use crate::tui::delegate::StatusDelegate;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Theme;

/// TUI-specific presentation state
pub struct TuiState {
    pub thread_view: ThreadViewState,
    pub theme: Theme,
    pub preset: MetricsPreset,
    pub avatar: VerticalAnchor,
    pub status_message: String,
    /// Settings carried over when the preset or avatar anchor changes.
    base: CalculatorConfig,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        let calculator = MessageSizeCalculator::new(config.calculator.clone());
        let mut thread_view = ThreadViewState::new(calculator);
        thread_view
            .layout
            .set_typing_indicator_visible(config.typing_indicator);
        Self {
            thread_view,
            theme: Theme::default(),
            preset: config.preset,
            avatar: config.calculator.incoming.avatar_position.vertical,
            status_message: String::new(),
            base: config.calculator.clone(),
        }
    }

    fn rebuild_calculator(&mut self) {
        let mut next = self
            .preset
            .calculator_config()
            .with_avatar_vertical(self.avatar);
        next.compaction_window_secs = self.base.compaction_window_secs;
        next.utc_offset = self.base.utc_offset;
        self.thread_view
            .set_calculator(MessageSizeCalculator::new(next));
    }

    pub fn cycle_preset(&mut self) {
        self.preset = self.preset.next();
        self.rebuild_calculator();
        self.status_message = format!("Preset: {}", self.preset.label());
        info!("Switched to {} preset", self.preset.label());
    }

    pub fn cycle_avatar(&mut self) {
        let anchors = VerticalAnchor::value_variants();
        let current = anchors
            .iter()
            .position(|anchor| *anchor == self.avatar)
            .unwrap_or(0);
        self.avatar = anchors[(current + 1) % anchors.len()];
        self.rebuild_calculator();
        let name = self
            .avatar
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        self.status_message = format!("Avatar: {name}");
    }

    pub fn toggle_typing(&mut self) {
        let layout = &mut self.thread_view.layout;
        let visible = !layout.typing_indicator_visible();
        layout.set_typing_indicator_visible(visible);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Title from the other participants' names.
pub fn thread_title<S: ThreadSource + ?Sized>(source: &S) -> String {
    let names: BTreeSet<&str> = (0..source.len())
        .filter_map(|index| source.message(index))
        .filter(|message| !source.is_from_current_sender(message))
        .map(|message| message.sender.display_name.as_str())
        .collect();
    if names.is_empty() {
        "Notes".to_string()
    } else {
        names.into_iter().collect::<Vec<_>>().join(", ")
    }
}

/// Split the frame into title bar and thread view.
fn frame_areas(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area)
}

pub fn draw_ui<S: ThreadSource + ?Sized>(
    frame: &mut Frame,
    source: &S,
    tui: &mut TuiState,
    images: Option<&ImageLoader>,
    typing_frame: usize,
) {
    let [title_area, thread_area] = frame_areas(frame.area());

    ThreadView::new(&mut tui.thread_view, source, &tui.theme)
        .images(images)
        .typing_frame(typing_frame)
        .render(frame, thread_area);

    let mut title_bar = TitleBar::new(
        thread_title(source),
        source.len(),
        tui.preset.label().to_string(),
    );
    title_bar.selected_time = tui
        .thread_view
        .selected_index
        .and_then(|index| source.message_timestamp_label(index));
    title_bar.status_message = tui.status_message.clone();
    title_bar.has_unseen_content = tui.thread_view.has_unseen_content();
    title_bar.render(frame, title_area);
}

fn build_image_loader(config: &ResolvedConfig) -> Option<ImageLoader> {
    if !config.images_enabled {
        info!("Image loading disabled by config");
        return None;
    }
    match HttpImageFetcher::new(config.image_timeout, &config.user_agent) {
        Ok(fetcher) => Some(
            ImageLoader::new(Arc::new(fetcher)).with_focus_on_faces(config.focus_on_faces),
        ),
        Err(e) => {
            warn!("Image loading disabled: {e}");
            None
        }
    }
}

/// Issues loads for image areas the last draw showed for the first time
/// or at a new size.
fn request_images(tui: &mut TuiState, thread: &MessageThread, images: Option<&mut ImageLoader>) {
    let requests = tui.thread_view.take_image_requests();
    let Some(loader) = images else {
        return;
    };
    for request in requests {
        if let Some(media) = thread
            .message(request.index)
            .and_then(|message| message.kind.media())
        {
            debug!("Requesting image for message {} at {:?}", request.index, request.target);
            loader.request(request.slot, media, request.target);
        }
    }
}

/// Routes one input event. Returns true when the app should quit.
fn handle_event(
    event: TuiEvent,
    thread: &MessageThread,
    tui: &mut TuiState,
    thread_area: Rect,
) -> bool {
    match event {
        TuiEvent::Quit | TuiEvent::ForceQuit => return true,
        TuiEvent::Resize => {}
        TuiEvent::ToggleTyping => tui.toggle_typing(),
        TuiEvent::CyclePreset => tui.cycle_preset(),
        TuiEvent::CycleAvatar => tui.cycle_avatar(),
        TuiEvent::Click(column, row) => {
            match tui.thread_view.hit_test(thread, thread_area, column, row) {
                Some((index, target)) => {
                    if target != TapTarget::Background {
                        tui.thread_view.selected_index = Some(index);
                    }
                    let mut delegate = StatusDelegate::new(thread, &mut tui.status_message);
                    dispatch_tap(&mut delegate, index, target);
                }
                None => debug!("Click at ({column}, {row}) hit no cell"),
            }
        }
        TuiEvent::LongPress(column, row) => {
            if let Some(index) = tui.thread_view.long_press(thread, thread_area, column, row) {
                tui.thread_view.selected_index = Some(index);
                StatusDelegate::new(thread, &mut tui.status_message).did_long_press_message(index);
            }
        }
        _ => {
            if let Some(ThreadViewEvent::Activate(index)) = tui.thread_view.handle_event(&event) {
                let mut delegate = StatusDelegate::new(thread, &mut tui.status_message);
                dispatch_tap(&mut delegate, index, TapTarget::Message);
            }
        }
    }
    false
}

pub fn run(config: ResolvedConfig, thread: MessageThread) -> std::io::Result<()> {
    let mut tui = TuiState::new(&config);
    let mut images = build_image_loader(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if let Some(loader) = images.as_mut()
            && loader.drain() > 0
        {
            needs_redraw = true;
        }

        let animating = tui.thread_view.layout.typing_indicator_visible();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let typing_frame = (start_time.elapsed().as_millis() / 300) as usize;
            terminal.draw(|f| draw_ui(f, &thread, &mut tui, images.as_ref(), typing_frame))?;
            request_images(&mut tui, &thread, images.as_mut());
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let [_, thread_area] = frame_areas(terminal.get_frame().area());
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &thread, &mut tui, thread_area) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }
    }

    ratatui::restore();
    info!("Terminal restored");
    Ok(())
}
