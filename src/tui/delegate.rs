//! Reports cell taps in the status line.

use log::info;

use crate::core::media;
use crate::core::message::MessageKind;
use crate::core::thread::ThreadSource;
use crate::layout::MessageCellDelegate;

pub struct StatusDelegate<'a, S: ThreadSource + ?Sized> {
    source: &'a S,
    status: &'a mut String,
}

impl<'a, S: ThreadSource + ?Sized> StatusDelegate<'a, S> {
    pub fn new(source: &'a S, status: &'a mut String) -> Self {
        Self { source, status }
    }

    fn sender(&self, index: usize) -> String {
        self.source
            .message(index)
            .map(|message| message.sender.display_name.clone())
            .unwrap_or_default()
    }

    fn report(&mut self, text: String) {
        info!("{text}");
        *self.status = text;
    }
}

impl<S: ThreadSource + ?Sized> MessageCellDelegate for StatusDelegate<'_, S> {
    fn did_tap_message(&mut self, index: usize) {
        let text = format!("Message {} from {}", index + 1, self.sender(index));
        self.report(text);
    }

    fn did_tap_avatar(&mut self, index: usize) {
        let text = format!("Avatar of {}", self.sender(index));
        self.report(text);
    }

    fn did_tap_cell_top_label(&mut self, index: usize) {
        let label = self.source.cell_top_label(index).unwrap_or_default();
        self.report(format!("Separator: {label}"));
    }

    fn did_tap_cell_bottom_label(&mut self, index: usize) {
        let label = self.source.cell_bottom_label(index).unwrap_or_default();
        self.report(format!("Footer: {label}"));
    }

    fn did_tap_message_top_label(&mut self, index: usize) {
        let text = format!("Sender: {}", self.sender(index));
        self.report(text);
    }

    fn did_tap_message_bottom_label(&mut self, index: usize) {
        let label = self.source.message_bottom_label(index).unwrap_or_default();
        self.report(format!("Status: {label}"));
    }

    fn did_tap_accessory_view(&mut self, index: usize) {
        self.report(format!("Accessory of message {}", index + 1));
    }

    fn did_tap_image(&mut self, index: usize) {
        let target = self
            .source
            .message(index)
            .and_then(|message| message.kind.media())
            .and_then(|item| item.url.clone())
            .unwrap_or_else(|| "image".to_string());
        self.report(format!("Open {target}"));
    }

    fn did_tap_play_button(&mut self, index: usize) {
        let text = match self.source.message(index).map(|message| &message.kind) {
            Some(MessageKind::Audio { audio, .. }) => {
                format!("Playing audio ({})", audio.duration_label())
            }
            Some(MessageKind::Video { media, .. }) => format!(
                "Playing {}",
                media.filename.as_deref().unwrap_or("video")
            ),
            _ => "Playing".to_string(),
        };
        self.report(text);
    }

    fn did_tap_background(&mut self, _index: usize) {
        self.status.clear();
    }

    fn did_long_press_message(&mut self, index: usize) {
        let text = format!(
            "Actions for message {} ({})",
            index + 1,
            media::initials(&self.sender(index))
        );
        self.report(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::AudioItem;
    use crate::core::message::Message;
    use crate::layout::cell::ContentHit;
    use crate::layout::{TapTarget, dispatch_tap};
    use crate::test_support::{LabelledThread, at, incoming, me};

    fn thread() -> LabelledThread {
        LabelledThread::new(vec![
            Message::text(incoming(), at(0), "hi"),
            Message::new(
                me(),
                at(60),
                MessageKind::Audio {
                    audio: AudioItem {
                        url: Some("https://cdn.test/a.m4a".into()),
                        duration: 61.0,
                        title: None,
                    },
                    caption: String::new(),
                },
            ),
        ])
    }

    fn tap(target: TapTarget, index: usize) -> String {
        let thread = thread();
        let mut status = String::from("previous");
        let mut delegate = StatusDelegate::new(&thread, &mut status);
        dispatch_tap(&mut delegate, index, target);
        status
    }

    #[test]
    fn test_taps_report_to_status() {
        assert_eq!(tap(TapTarget::Message, 0), "Message 1 from Ada");
        assert_eq!(tap(TapTarget::Avatar, 0), "Avatar of Ada");
        assert_eq!(tap(TapTarget::CellTopLabel, 0), "Separator: Today");
        assert_eq!(tap(TapTarget::MessageBottomLabel, 1), "Status: Edited");
        assert_eq!(
            tap(TapTarget::Content(ContentHit::PlayButton), 1),
            "Playing audio (1:01)"
        );
    }

    #[test]
    fn test_background_tap_clears_status() {
        assert_eq!(tap(TapTarget::Background, 0), "");
    }

    #[test]
    fn test_long_press() {
        let thread = thread();
        let mut status = String::new();
        StatusDelegate::new(&thread, &mut status).did_long_press_message(1);
        assert_eq!(status, "Actions for message 2 (M)");
    }
}
