//! # ThreadView Component
//!
//! Scrollable view of a message thread.
//!
//! `ThreadView` is created each frame around `&mut ThreadViewState`, the
//! persistent part: the flow layout with its height cache, the scroll
//! offset and the selection. Rendering brings the layout up to date with
//! the thread and draws only the cells near the viewport.
//!
//! All geometry comes from [`MessagesFlowLayout`] in layout units and is
//! mapped to rows and columns through the state's [`GridScale`].

use std::collections::HashMap;

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use uuid::Uuid;

use crate::core::geometry::{EdgeInsets, Point};
use crate::core::thread::ThreadSource;
use crate::layout::{
    CellFrames, MessageSizeCalculator, MessagesFlowLayout, TapTarget, layout_cell,
};
use crate::media::ImageLoader;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message_cell::{CellLabels, MessageCell};
use crate::tui::event::TuiEvent;
use crate::tui::grid::GridScale;
use crate::tui::theme::Theme;

const TYPING_FRAMES: [&str; 3] = ["•  ", "•• ", "•••"];

/// An image area drawn in the last frame, sized in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRequest {
    pub index: usize,
    pub slot: Uuid,
    pub target: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadViewEvent {
    /// Enter on the selected message.
    Activate(usize),
}

/// Layout, scroll and selection state of the thread view.
/// Must be persisted across frames.
pub struct ThreadViewState {
    pub scroll_state: ScrollViewState,
    pub layout: MessagesFlowLayout,
    pub scale: GridScale,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    drawn_images: Vec<ImageRequest>,
    requested_images: HashMap<Uuid, (u32, u32)>,
}

fn section_insets(calculator: &MessageSizeCalculator) -> EdgeInsets {
    let spacing = calculator.config().metrics.stack_spacing;
    EdgeInsets::new(spacing, 0.0, spacing, 0.0)
}

impl ThreadViewState {
    pub fn new(calculator: MessageSizeCalculator) -> Self {
        let scale = GridScale::for_metrics(&calculator.config().metrics);
        let insets = section_insets(&calculator);
        Self {
            scroll_state: ScrollViewState::default(),
            layout: MessagesFlowLayout::new(calculator, insets),
            scale,
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
            drawn_images: Vec::new(),
            requested_images: HashMap::new(),
        }
    }

    /// Swaps the calculator, dropping cached heights and image sizes.
    pub fn set_calculator(&mut self, calculator: MessageSizeCalculator) {
        let typing = self.layout.typing_indicator_visible();
        self.scale = GridScale::for_metrics(&calculator.config().metrics);
        let insets = section_insets(&calculator);
        self.layout = MessagesFlowLayout::new(calculator, insets);
        self.layout.set_typing_indicator_visible(typing);
        self.requested_images.clear();
    }

    pub fn item_count(&self) -> usize {
        self.layout.cache().heights.len()
    }

    /// Canvas height in rows.
    pub fn content_rows(&self) -> u16 {
        (self.layout.content_height() / self.scale.unit_height).ceil() as u16
    }

    fn max_offset(&self) -> u16 {
        self.content_rows().saturating_sub(self.viewport_height)
    }

    /// Rows `[top, bottom)` of item `index` in the canvas.
    fn item_rows(&self, index: usize) -> Option<(u16, u16)> {
        let rect = self.scale.to_cells(self.layout.item_frame(index)?);
        Some((rect.y, rect.y + rect.height))
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Move the offset to the last page so the visible range is taken
    /// from the bottom of the thread.
    fn pin_to_bottom(&mut self) {
        let max_y = self.max_offset();
        self.scroll_state.set_offset(Position { x: 0, y: max_y });
    }

    /// Re-engage auto-scroll once the user has scrolled to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some((top, bottom)) = self.selected_index.and_then(|i| self.item_rows(i)) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
            self.stick_to_bottom = false;
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    pub fn select_previous(&mut self) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        self.selected_index = Some(
            self.selected_index
                .map(|i| i.saturating_sub(1))
                .unwrap_or(count - 1),
        );
        self.scroll_to_selected();
    }

    pub fn select_next(&mut self) {
        let count = self.item_count();
        if let Some(index) = self.selected_index
            && index + 1 < count
        {
            self.selected_index = Some(index + 1);
            self.scroll_to_selected();
        }
    }

    /// Whether content exists below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    /// Resolves a terminal position inside `area` to a cell and the sub-view
    /// under it.
    pub fn hit_test<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        area: Rect,
        column: u16,
        row: u16,
    ) -> Option<(usize, TapTarget)> {
        let (index, cell, local) = self.locate(source, area, column, row)?;
        Some((index, cell.hit_test(local)))
    }

    /// Index of the message whose bubble is under the position, if any.
    pub fn long_press<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        area: Rect,
        column: u16,
        row: u16,
    ) -> Option<usize> {
        let (index, cell, local) = self.locate(source, area, column, row)?;
        cell.long_press(local).then_some(index)
    }

    fn locate<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        area: Rect,
        column: u16,
        row: u16,
    ) -> Option<(usize, CellFrames, Point)> {
        if !area.contains(Position { x: column, y: row }) {
            return None;
        }
        let content_row = (row - area.y).saturating_add(self.scroll_state.offset().y);
        let point = self.scale.cell_center(column - area.x, content_row);
        let index = self.layout.item_at(point.y)?;
        let frame = self.layout.item_frame(index)?;
        let attrs = self.layout.attributes_for_item(source, index).ok()?;
        let cell = layout_cell(&attrs, &self.layout.calculator().config().metrics);
        Some((index, cell, frame.to_local(point)))
    }

    /// Image areas drawn since the last call whose size changed or that
    /// were never requested.
    pub fn take_image_requests(&mut self) -> Vec<ImageRequest> {
        let drawn = std::mem::take(&mut self.drawn_images);
        drawn
            .into_iter()
            .filter(|request| {
                let previous = self.requested_images.insert(request.slot, request.target);
                previous != Some(request.target)
            })
            .collect()
    }
}

pub struct ThreadView<'a, S: ThreadSource + ?Sized> {
    pub state: &'a mut ThreadViewState,
    pub source: &'a S,
    pub images: Option<&'a ImageLoader>,
    pub theme: &'a Theme,
    pub typing_frame: usize,
}

impl<'a, S: ThreadSource + ?Sized> ThreadView<'a, S> {
    pub fn new(state: &'a mut ThreadViewState, source: &'a S, theme: &'a Theme) -> Self {
        Self {
            state,
            source,
            images: None,
            theme,
            typing_frame: 0,
        }
    }

    pub fn images(mut self, images: Option<&'a ImageLoader>) -> Self {
        self.images = images;
        self
    }

    pub fn typing_frame(mut self, frame: usize) -> Self {
        self.typing_frame = frame;
        self
    }
}

impl<S: ThreadSource + ?Sized> Component for ThreadView<'_, S> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let state = &mut *self.state;
        let scale = state.scale;

        // 1. Bring the layout cache up to date
        state
            .layout
            .set_content_width(scale.columns_to_units(content_width));
        state.layout.prepare(self.source);

        // 2. Clamp scroll offset to prevent overscrolling past content
        state.viewport_height = area.height;
        if state.stick_to_bottom {
            state.pin_to_bottom();
        } else {
            state.clamp_scroll();
        }
        if let Some(index) = state.selected_index
            && index >= state.item_count()
        {
            state.selected_index = None;
        }

        let scroll_offset = state.scroll_state.offset().y;
        let visible_range = state.layout.visible_range(
            scale.rows_to_units(scroll_offset),
            scale.rows_to_units(area.height),
        );

        // 3. Render visible cells into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, state.content_rows()))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        let metrics = state.layout.calculator().config().metrics.clone();
        state.drawn_images.clear();

        for index in visible_range {
            let (Some(message), Some(item_frame)) =
                (self.source.message(index), state.layout.item_frame(index))
            else {
                continue;
            };
            let attrs = match state.layout.attributes_for_item(self.source, index) {
                Ok(attrs) => attrs,
                Err(e) => {
                    warn!("Skipping cell {index}: {e}");
                    continue;
                }
            };
            let cell_rect = scale.to_cells(item_frame);
            if cell_rect.is_empty() {
                continue;
            }
            let frames = layout_cell(&attrs, &metrics);
            let labels = CellLabels::from_source(self.source, index);

            if message.kind.media().is_some()
                && let Some(image_frame) = frames.image
            {
                let image_area = scale.to_cells(image_frame);
                state.drawn_images.push(ImageRequest {
                    index,
                    slot: message.id,
                    target: (
                        u32::from(image_area.width),
                        u32::from(image_area.height) * 2,
                    ),
                });
            }

            let cell = MessageCell::new(message, &attrs, &frames, &labels, self.theme, scale)
                .outgoing(self.source.is_from_current_sender(message))
                .image(self.images.and_then(|loader| loader.state(message.id)))
                .selected(state.selected_index == Some(index));
            scroll_view.render_widget(cell, cell_rect);
        }

        if let Some(typing) = state.layout.typing_indicator_frame() {
            let rect = scale.to_cells(typing);
            let dots = TYPING_FRAMES[self.typing_frame % TYPING_FRAMES.len()];
            let line = Line::styled(format!(" {dots}"), self.theme.typing);
            scroll_view.render_widget(Paragraph::new(line), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut state.scroll_state);
    }
}

/// EventHandler lives on the state because the view is rebuilt each frame.
impl EventHandler for ThreadViewState {
    type Event = ThreadViewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToTop => {
                self.scroll_state.scroll_to_top();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.pin_to_bottom();
            }
            TuiEvent::CursorUp => self.select_previous(),
            TuiEvent::CursorDown => self.select_next(),
            TuiEvent::Activate => return self.selected_index.map(ThreadViewEvent::Activate),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::layout::CalculatorConfig;
    use crate::layout::cell::ContentHit;
    use crate::test_support::{LabelledThread, at, incoming, me};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn thread(count: usize) -> LabelledThread {
        let messages = (0..count)
            .map(|i| {
                let sender = if i % 2 == 0 { incoming() } else { me() };
                // Far enough apart that no cell is compact.
                Message::text(sender, at(i as i64 * 600), format!("message number {i}"))
            })
            .collect();
        LabelledThread::bare(messages)
    }

    fn state() -> ThreadViewState {
        ThreadViewState::new(MessageSizeCalculator::new(CalculatorConfig::cells()))
    }

    fn draw(state: &mut ThreadViewState, source: &LabelledThread, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                ThreadView::new(state, source, &theme).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_sticks_to_bottom_on_first_draw() {
        let source = thread(20);
        let mut state = state();
        let text = draw(&mut state, &source, 40, 10);
        assert!(text.contains("message number 19"));
        assert!(!text.contains("message number 0"));
        assert!(state.stick_to_bottom);
        assert!(state.scroll_state.offset().y > 0);
        assert_eq!(state.scroll_state.offset().y, state.max_offset());
    }

    #[test]
    fn test_new_messages_drawn_while_stuck_to_bottom() {
        let mut state = state();
        draw(&mut state, &thread(20), 40, 10);
        let text = draw(&mut state, &thread(25), 40, 10);
        assert!(text.contains("message number 24"));
        assert_eq!(state.scroll_state.offset().y, state.max_offset());
    }

    #[test]
    fn test_scroll_up_unpins() {
        let source = thread(20);
        let mut state = state();
        draw(&mut state, &source, 40, 10);
        for _ in 0..3 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        assert!(!state.stick_to_bottom);
        assert!(state.has_unseen_content());
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_cursor_selects_from_last_and_scrolls() {
        let source = thread(20);
        let mut state = state();
        draw(&mut state, &source, 40, 10);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected_index, Some(19));
        for _ in 0..19 {
            state.handle_event(&TuiEvent::CursorUp);
        }
        assert_eq!(state.selected_index, Some(0));
        // Item 0 starts below the section's top inset.
        assert_eq!(state.scroll_state.offset().y, 1);
        assert!(!state.stick_to_bottom);
        assert_eq!(
            state.handle_event(&TuiEvent::Activate),
            Some(ThreadViewEvent::Activate(0))
        );
    }

    #[test]
    fn test_hit_test_finds_bubble() {
        let source = thread(1);
        let mut state = state();
        state.stick_to_bottom = false;
        let area = Rect::new(0, 0, 40, 10);
        draw(&mut state, &source, 40, 10);
        // Incoming bubble: avatar 3 + gap 1, one row of inset above the text.
        let Some(frame) = state.layout.item_frame(0) else {
            panic!("item 0 laid out");
        };
        let row = frame.min_y() as u16 + 2;
        assert_eq!(
            state.hit_test(&source, area, 6, row),
            Some((0, TapTarget::Message))
        );
        assert_eq!(state.long_press(&source, area, 6, row), Some(0));
        assert_eq!(state.hit_test(&source, area, 38, row).map(|hit| hit.1), Some(TapTarget::Background));
        assert_eq!(state.long_press(&source, area, 38, row), None);
        assert_ne!(
            state.hit_test(&source, area, 6, row).map(|hit| hit.1),
            Some(TapTarget::Content(ContentHit::Image))
        );
    }

    #[test]
    fn test_hit_outside_area_is_none() {
        let source = thread(1);
        let mut state = state();
        draw(&mut state, &source, 40, 10);
        assert_eq!(state.hit_test(&source, Rect::new(0, 2, 40, 8), 5, 0), None);
    }

    #[test]
    fn test_typing_indicator_extends_canvas() {
        let source = thread(2);
        let mut state = state();
        draw(&mut state, &source, 40, 20);
        let before = state.content_rows();
        state.layout.set_typing_indicator_visible(true);
        let text = draw(&mut state, &source, 40, 20);
        assert_eq!(state.content_rows(), before + 2);
        assert!(text.contains('•'));
    }

    #[test]
    fn test_image_requests_are_deduplicated() {
        use crate::core::media::MediaItem;
        use crate::core::message::MessageKind;

        let photo = Message::new(
            incoming(),
            at(0),
            MessageKind::Photo {
                caption: String::new(),
                media: MediaItem::from_url("https://cdn.test/cat.png"),
            },
        );
        let slot = photo.id;
        let source = LabelledThread::bare(vec![photo]);
        let mut state = state();
        draw(&mut state, &source, 40, 10);
        let requests = state.take_image_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].slot, slot);
        // 39 columns less avatar and padding, 3 rows of half blocks.
        assert_eq!(requests[0].target, (34, 6));

        draw(&mut state, &source, 40, 10);
        assert!(state.take_image_requests().is_empty());
    }

    #[test]
    fn test_points_preset_scales_to_cells() {
        let source = thread(3);
        let mut state =
            ThreadViewState::new(MessageSizeCalculator::new(CalculatorConfig::points()));
        let text = draw(&mut state, &source, 60, 30);
        assert!(text.contains("message number 2"));
        assert_eq!(state.scale, GridScale { unit_width: 7.0, unit_height: 17.0 });
    }
}
