//! # MessageCell Component
//!
//! Draws one message cell from the frames [`layout_cell`] placed.
//!
//! Frames arrive in cell-local layout units and are mapped to terminal
//! cells through a [`GridScale`]. Sub-views are drawn bottom to top in the
//! cell's stacking order, so the avatar ends up over the container.
//!
//! Images use half-block glyphs: every terminal cell shows two pixels, the
//! upper one as the foreground of `▀` and the lower one as its background.
//!
//! [`layout_cell`]: crate::layout::layout_cell

use image::{DynamicImage, GenericImageView};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect as CellRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::core::geometry::{EdgeInsets, Point, Rect, Size};
use crate::core::media::{self, MediaItem, Placeholder};
use crate::core::member;
use crate::core::message::{Message, MessageKind};
use crate::core::thread::ThreadSource;
use crate::layout::attributes::{LabelAlignment, TextAlignment};
use crate::layout::text;
use crate::layout::{CellFrames, LayoutAttributes};
use crate::media::fit;
use crate::media::{ImageState, LoadedImage};
use crate::tui::grid::GridScale;
use crate::tui::theme::{self, Theme};

/// Label texts of one cell, pulled from the thread source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellLabels {
    pub cell_top: Option<String>,
    pub cell_bottom: Option<String>,
    pub message_top: Option<String>,
    pub message_bottom: Option<String>,
}

impl CellLabels {
    pub fn from_source<S: ThreadSource + ?Sized>(source: &S, index: usize) -> Self {
        Self {
            cell_top: source.cell_top_label(index),
            cell_bottom: source.cell_bottom_label(index),
            message_top: source.message_top_label(index),
            message_bottom: source.message_bottom_label(index),
        }
    }
}

pub struct MessageCell<'a> {
    message: &'a Message,
    attrs: &'a LayoutAttributes,
    frames: &'a CellFrames,
    labels: &'a CellLabels,
    is_outgoing: bool,
    image: Option<&'a ImageState>,
    theme: &'a Theme,
    scale: GridScale,
    is_selected: bool,
}

impl<'a> MessageCell<'a> {
    pub fn new(
        message: &'a Message,
        attrs: &'a LayoutAttributes,
        frames: &'a CellFrames,
        labels: &'a CellLabels,
        theme: &'a Theme,
        scale: GridScale,
    ) -> Self {
        Self {
            message,
            attrs,
            frames,
            labels,
            is_outgoing: false,
            image: None,
            theme,
            scale,
            is_selected: false,
        }
    }

    pub fn outgoing(mut self, is_outgoing: bool) -> Self {
        self.is_outgoing = is_outgoing;
        self
    }

    pub fn image(mut self, image: Option<&'a ImageState>) -> Self {
        self.image = image;
        self
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }
}

/// Maps cell-local layout frames into the buffer area of one cell.
struct Placer {
    area: CellRect,
    scale: GridScale,
}

impl Placer {
    fn place(&self, frame: Rect) -> CellRect {
        let local = self.scale.to_cells(frame);
        CellRect::new(
            self.area.x.saturating_add(local.x),
            self.area.y.saturating_add(local.y),
            local.width,
            local.height,
        )
        .intersection(self.area)
    }
}

fn inset(frame: Rect, insets: EdgeInsets) -> Rect {
    Rect::new(
        frame.min_x() + insets.left,
        frame.min_y() + insets.top,
        (frame.size.width - insets.horizontal()).max(0.0),
        (frame.size.height - insets.vertical()).max(0.0),
    )
}

fn alignment(text_alignment: TextAlignment) -> Alignment {
    match text_alignment {
        TextAlignment::Left => Alignment::Left,
        TextAlignment::Center => Alignment::Center,
        TextAlignment::Right => Alignment::Right,
    }
}

/// Splits `line` into plain and mention spans.
fn highlighted_line(line: &str, names: &[String], base: Style, mention: Style) -> Line<'static> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in member::highlight_ranges(line, names) {
        if range.start < cursor {
            continue;
        }
        if range.start > cursor {
            spans.push(Span::styled(line[cursor..range.start].to_string(), base));
        }
        spans.push(Span::styled(line[range.clone()].to_string(), mention));
        cursor = range.end;
    }
    if cursor < line.len() {
        spans.push(Span::styled(line[cursor..].to_string(), base));
    }
    Line::from(spans)
}

fn wrapped(text: &str, area: CellRect, style: Style) -> Vec<Line<'static>> {
    text::wrap_lines(text, usize::from(area.width))
        .into_iter()
        .map(|line| Line::styled(line, style))
        .collect()
}

/// Draws `glyph` centered in `area`.
fn draw_glyph(buf: &mut Buffer, area: CellRect, glyph: &str, style: Style) {
    if area.is_empty() {
        return;
    }
    let middle = CellRect::new(area.x, area.y + area.height / 2, area.width, 1);
    Paragraph::new(Line::styled(glyph.to_string(), style))
        .alignment(Alignment::Center)
        .render(middle, buf);
}

/// Color of the image pixel under view pixel (`x`, `y`), if the placed
/// image covers it.
fn sample(image: &DynamicImage, placement: Rect, x: u16, y: u16) -> Option<Color> {
    let point = Point::new(f32::from(x) + 0.5, f32::from(y) + 0.5);
    if !placement.contains(point) {
        return None;
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let ix = ((point.x - placement.min_x()) / placement.size.width * width as f32) as u32;
    let iy = ((point.y - placement.min_y()) / placement.size.height * height as f32) as u32;
    let [r, g, b, _] = image.get_pixel(ix.min(width - 1), iy.min(height - 1)).0;
    Some(Color::Rgb(r, g, b))
}

fn draw_halfblocks(buf: &mut Buffer, area: CellRect, loaded: &LoadedImage, background: Color) {
    let image = loaded.image.as_ref();
    let view = Size::new(f32::from(area.width), f32::from(area.height) * 2.0);
    let (width, height) = image.dimensions();
    let placement = loaded
        .crop
        .unwrap_or_else(|| fit::aspect_fit(Size::new(width as f32, height as f32), view));
    if placement.size.is_empty() {
        return;
    }
    for row in 0..area.height {
        for col in 0..area.width {
            let top = sample(image, placement, col, row * 2).unwrap_or(background);
            let bottom = sample(image, placement, col, row * 2 + 1).unwrap_or(background);
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol("▀").set_fg(top).set_bg(bottom);
            }
        }
    }
}

impl MessageCell<'_> {
    fn bubble_style(&self) -> Style {
        self.theme
            .bubble(self.is_outgoing, self.message.is_internal)
    }

    fn draw_label(
        &self,
        placer: &Placer,
        buf: &mut Buffer,
        text: Option<&str>,
        frame: Rect,
        label_alignment: LabelAlignment,
        style: Style,
    ) {
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            return;
        };
        let area = placer.place(inset(frame, label_alignment.text_insets));
        if area.is_empty() {
            return;
        }
        Paragraph::new(wrapped(text, area, style))
            .alignment(alignment(label_alignment.text_alignment))
            .render(area, buf);
    }

    fn draw_body_text(&self, buf: &mut Buffer, area: CellRect, text: &str, style: Style) {
        if area.is_empty() || text.is_empty() {
            return;
        }
        let names = member::mention_names(&self.message.members);
        let lines: Vec<Line> = text::wrap_lines(text, usize::from(area.width))
            .iter()
            .map(|line| highlighted_line(line, &names, style, self.theme.mention))
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn draw_image(&self, placer: &Placer, buf: &mut Buffer, media: &MediaItem) {
        let Some(frame) = self.frames.image else {
            return;
        };
        let area = placer.place(frame);
        let background = self.bubble_style().bg.unwrap_or(Color::Reset);
        match self.image {
            Some(ImageState::Ready(loaded)) => draw_halfblocks(buf, area, loaded, background),
            Some(ImageState::Loading) => draw_glyph(buf, area, "…", self.theme.placeholder),
            Some(ImageState::Failed(placeholder)) => {
                draw_glyph(buf, area, placeholder.glyph(), self.theme.placeholder)
            }
            None => draw_glyph(buf, area, media.placeholder.glyph(), self.theme.placeholder),
        }
    }

    fn draw_play_button(&self, placer: &Placer, buf: &mut Buffer) {
        if let Some(button) = self.frames.play_button {
            let area = placer.place(button);
            buf.set_style(area, self.theme.play_button);
            draw_glyph(buf, area, Placeholder::Video.glyph(), self.theme.play_button);
        }
    }

    /// Row right of the play button, or the bottom row of a file bubble.
    fn attachment_strip(&self, placer: &Placer, container: Rect) -> CellRect {
        let unit = self.scale.unit_width;
        let strip = match self.frames.play_button {
            Some(button) => Rect::new(
                button.max_x() + unit,
                button.min_y(),
                container.max_x() - button.max_x() - 2.0 * unit,
                button.size.height,
            ),
            None => Rect::new(
                container.min_x() + unit,
                container.max_y() - self.scale.unit_height,
                container.size.width - 2.0 * unit,
                self.scale.unit_height,
            ),
        };
        placer.place(Rect::from_origin_size(
            strip.origin,
            Size::new(strip.size.width.max(0.0), strip.size.height),
        ))
    }

    fn draw_content(&self, placer: &Placer, buf: &mut Buffer, container: Rect) {
        let style = self.bubble_style();
        let body = inset(container, self.attrs.message_label_insets);
        let body_area = placer.place(body);

        match &self.message.kind {
            MessageKind::Text { text } | MessageKind::Emoji { text } => {
                self.draw_body_text(buf, body_area, text, style);
            }
            MessageKind::AttributedText { text, font } => {
                let style = style.add_modifier(theme::font_modifiers(*font));
                self.draw_body_text(buf, body_area, text, style);
            }
            MessageKind::Photo { caption, media }
            | MessageKind::Video { caption, media }
            | MessageKind::Gif { caption, media } => {
                let caption_bottom = self
                    .frames
                    .image
                    .map(|image| image.min_y())
                    .unwrap_or(body.max_y());
                let caption_area = placer.place(Rect::new(
                    body.min_x(),
                    body.min_y(),
                    body.size.width,
                    (caption_bottom - body.min_y()).max(0.0),
                ));
                self.draw_body_text(buf, caption_area, caption, style);
                self.draw_image(placer, buf, media);
                self.draw_play_button(placer, buf);
                if matches!(self.message.kind, MessageKind::Gif { .. })
                    && let Some(image) = self.frames.image
                {
                    let corner = placer.place(image);
                    buf.set_string(
                        corner.x,
                        corner.y,
                        "GIF",
                        style.add_modifier(Modifier::BOLD),
                    );
                }
            }
            MessageKind::Audio { audio, caption } => {
                self.draw_body_text(buf, body_area, caption, style);
                self.draw_play_button(placer, buf);
                let strip = self.attachment_strip(placer, container);
                let label = match &audio.title {
                    Some(title) => format!("{} {title}", audio.duration_label()),
                    None => audio.duration_label(),
                };
                Paragraph::new(Line::styled(label, style)).render(strip, buf);
            }
            MessageKind::File { caption, media } => {
                self.draw_body_text(buf, body_area, caption, style);
                let strip = self.attachment_strip(placer, container);
                let name = media
                    .filename
                    .clone()
                    .or_else(|| media.url.as_deref().and_then(file_name))
                    .unwrap_or_else(|| "file".to_string());
                let label = match media.file_size {
                    Some(bytes) => format!(
                        "{} {name} ({})",
                        media.placeholder.glyph(),
                        media::readable_size(bytes)
                    ),
                    None => format!("{} {name}", media.placeholder.glyph()),
                };
                Paragraph::new(Line::styled(label, style)).render(strip, buf);
            }
            MessageKind::Contact { contact } => {
                let area = placer.place(inset(container, self.padding()));
                let mut lines = vec![Line::from(vec![
                    Span::styled(format!("({}) ", contact.initials()), self.theme.avatar),
                    Span::styled(
                        contact.display_name.clone(),
                        style.add_modifier(Modifier::BOLD),
                    ),
                ])];
                if let Some(detail) = contact
                    .phone_numbers
                    .first()
                    .or_else(|| contact.emails.first())
                {
                    lines.push(Line::styled(detail.clone(), style));
                }
                Paragraph::new(lines).render(area, buf);
            }
            MessageKind::Location { location } => {
                let area = placer.place(inset(container, self.padding()));
                let label = location.label.as_deref().unwrap_or("Location");
                let lines = vec![
                    Line::styled(format!("⌖ {label}"), style.add_modifier(Modifier::BOLD)),
                    Line::styled(
                        format!("{:.4}, {:.4}", location.latitude, location.longitude),
                        style,
                    ),
                ];
                Paragraph::new(lines).render(area, buf);
            }
            MessageKind::LinkPreview { preview } => {
                let mut lines = Vec::new();
                if let Some(text) = preview.text.as_deref() {
                    lines.extend(wrapped(text, body_area, style));
                }
                if let Some(title) = preview.title.as_deref() {
                    lines.extend(wrapped(title, body_area, style.add_modifier(Modifier::BOLD)));
                }
                lines.extend(wrapped(
                    &preview.teaser,
                    body_area,
                    style.add_modifier(Modifier::DIM),
                ));
                if preview.thumbnail_url.is_some() {
                    lines.push(Line::styled(
                        Placeholder::Photo.glyph().to_string(),
                        self.theme.placeholder,
                    ));
                }
                Paragraph::new(lines).render(body_area, buf);
            }
            MessageKind::Header { text, .. } => {
                Paragraph::new(wrapped(text, body_area, self.theme.header))
                    .alignment(Alignment::Center)
                    .render(body_area, buf);
            }
            MessageKind::Custom { payload, .. } => {
                let summary = payload
                    .get("type")
                    .and_then(|kind| kind.as_str())
                    .unwrap_or("custom");
                draw_glyph(buf, placer.place(container), &format!("◆ {summary}"), style);
            }
        }
    }

    /// One column of breathing room for kinds without text insets.
    fn padding(&self) -> EdgeInsets {
        EdgeInsets::new(0.0, self.scale.unit_width, 0.0, self.scale.unit_width)
    }

    fn draw_avatar(&self, placer: &Placer, buf: &mut Buffer) {
        if self.frames.avatar_hidden || self.frames.avatar.size.is_empty() {
            return;
        }
        let area = placer.place(self.frames.avatar);
        buf.set_style(area, self.theme.avatar);
        draw_glyph(
            buf,
            area,
            &media::initials(&self.message.sender.display_name),
            self.theme.avatar,
        );
    }
}

fn file_name(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl Widget for MessageCell<'_> {
    fn render(self, area: CellRect, buf: &mut Buffer) {
        let placer = Placer {
            area,
            scale: self.scale,
        };
        let attrs = self.attrs;
        let frames = self.frames;

        // Accessory views are host-drawn; only their space is reserved.
        self.draw_label(
            &placer,
            buf,
            self.labels.cell_top.as_deref(),
            frames.cell_top_label,
            attrs.cell_top_label_alignment,
            self.theme.cell_top_label,
        );
        self.draw_label(
            &placer,
            buf,
            self.labels.message_top.as_deref(),
            frames.message_top_label,
            attrs.message_top_label_alignment,
            self.theme.label,
        );
        self.draw_label(
            &placer,
            buf,
            self.labels.message_bottom.as_deref(),
            frames.message_bottom_label,
            attrs.message_bottom_label_alignment,
            self.theme.label,
        );
        self.draw_label(
            &placer,
            buf,
            self.labels.cell_bottom.as_deref(),
            frames.cell_bottom_label,
            attrs.cell_bottom_label_alignment,
            self.theme.label,
        );

        let container_area = placer.place(frames.container);
        if !matches!(self.message.kind, MessageKind::Header { .. }) {
            let block = if self.is_selected {
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.theme.selected_border)
            } else {
                Block::default()
            };
            block.style(self.bubble_style()).render(container_area, buf);
        } else if self.is_selected {
            buf.set_style(container_area, Style::default().add_modifier(Modifier::REVERSED));
        }
        self.draw_content(&placer, buf, frames.container);

        self.draw_avatar(&placer, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::media::{AudioItem, ContactItem};
    use crate::core::member::{GroupMember, Member};
    use crate::layout::{MessageSizeCalculator, layout_cell};
    use crate::layout::style::CalculatorConfig;
    use crate::test_support::{LabelledThread, at, incoming, me};

    const WIDTH: f32 = 40.0;

    fn render(thread: &LabelledThread, index: usize, image: Option<&ImageState>) -> Buffer {
        let calculator = MessageSizeCalculator::new(CalculatorConfig::cells());
        let Ok(attrs) = calculator.attributes_for_item(thread, index, WIDTH) else {
            panic!("attributes for {index}");
        };
        let frames = layout_cell(&attrs, &calculator.config().metrics);
        let labels = CellLabels::from_source(thread, index);
        let theme = Theme::default();
        let Some(message) = thread.message(index) else {
            panic!("message {index}");
        };
        let area = CellRect::new(0, 0, WIDTH as u16, attrs.size.height as u16);
        let mut buf = Buffer::empty(area);
        MessageCell::new(message, &attrs, &frames, &labels, &theme, GridScale::default())
            .outgoing(thread.is_from_current_sender(message))
            .image(image)
            .render(area, &mut buf);
        buf
    }

    fn text_of(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_text_bubble_shows_body_and_labels() {
        let thread = LabelledThread::new(vec![Message::text(incoming(), at(0), "hello there")]);
        let text = text_of(&render(&thread, 0, None));
        assert!(text.contains("hello there"));
        assert!(text.contains("Today"));
        assert!(text.contains("Ada"));
        // Avatar initials
        assert!(text.contains("A"));
    }

    #[test]
    fn test_mentions_are_highlighted() {
        let mut message = Message::text(incoming(), at(0), "ping Ada Lovelace");
        message.members = vec![Member::Group(GroupMember {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            did: "+15550100".into(),
            user_id: "u-1".into(),
            left_thread: false,
            is_shared: None,
        })];
        let thread = LabelledThread::bare(vec![message]);
        let buf = render(&thread, 0, None);
        let theme = Theme::default();
        let highlighted = buf
            .content()
            .iter()
            .filter(|cell| cell.fg == theme.mention.fg.unwrap_or(Color::Reset))
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert_eq!(highlighted, "Ada Lovelace");
    }

    #[test]
    fn test_photo_without_state_shows_placeholder() {
        let kind = MessageKind::Photo {
            caption: "cat".into(),
            media: MediaItem::from_url("https://cdn.test/cat.png"),
        };
        let thread = LabelledThread::bare(vec![Message::new(me(), at(0), kind)]);
        let text = text_of(&render(&thread, 0, None));
        assert!(text.contains("cat"));
        assert!(text.contains(Placeholder::Photo.glyph()));
    }

    #[test]
    fn test_ready_image_draws_halfblocks() {
        let kind = MessageKind::Photo {
            caption: String::new(),
            media: MediaItem::from_url("https://cdn.test/red.png"),
        };
        let thread = LabelledThread::bare(vec![Message::new(incoming(), at(0), kind)]);
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([255, 0, 0]),
        ));
        let state = ImageState::Ready(LoadedImage {
            image: Arc::new(image),
            source_url: "https://cdn.test/red.png".into(),
            crop: None,
        });
        let buf = render(&thread, 0, Some(&state));
        assert!(buf.content().iter().any(|cell| {
            cell.symbol() == "▀" && cell.fg == Color::Rgb(255, 0, 0)
        }));
    }

    #[test]
    fn test_audio_shows_play_button_and_duration() {
        let kind = MessageKind::Audio {
            audio: AudioItem {
                url: None,
                duration: 75.0,
                title: None,
            },
            caption: String::new(),
        };
        let thread = LabelledThread::bare(vec![Message::new(incoming(), at(0), kind)]);
        let text = text_of(&render(&thread, 0, None));
        assert!(text.contains("▶"));
        assert!(text.contains("1:15"));
    }

    #[test]
    fn test_contact_shows_initials_and_number() {
        let kind = MessageKind::Contact {
            contact: ContactItem {
                display_name: "Grace Hopper".into(),
                phone_numbers: vec!["+15550123".into()],
                emails: Vec::new(),
            },
        };
        let thread = LabelledThread::bare(vec![Message::new(incoming(), at(0), kind)]);
        let text = text_of(&render(&thread, 0, None));
        assert!(text.contains("(GH) Grace Hopper"));
        assert!(text.contains("+15550123"));
    }

    #[test]
    fn test_compact_cell_hides_avatar() {
        let thread = LabelledThread::bare(vec![
            Message::text(incoming(), at(0), "one"),
            Message::text(incoming(), at(5), "two"),
        ]);
        let theme = Theme::default();
        let avatar_bg = theme.avatar.bg;
        let first = render(&thread, 0, None);
        let second = render(&thread, 1, None);
        assert!(!first.content().iter().any(|cell| Some(cell.bg) == avatar_bg));
        assert!(second.content().iter().any(|cell| Some(cell.bg) == avatar_bg));
    }

    #[test]
    fn test_highlighted_line_splits_spans() {
        let names = vec!["Ada".to_string()];
        let line = highlighted_line("hi Ada!", &names, Style::default(), Style::default().add_modifier(Modifier::BOLD));
        let parts: Vec<&str> = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(parts, vec!["hi ", "Ada", "!"]);
    }
}
