use std::sync::{ Mutex, MutexGuard };
use crate::models::chat::Sender;
use super::{ Field, Section, View };

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Transcript(Sender, String),
    ChatInputCleared,
    ChatBusy(bool),
    SuccessShown,
    ErrorShown(String),
    MessagesHidden,
    Scrolled(Section),
    Focused(Field),
}

/// Headless view that remembers everything rendered into it.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ViewEvent>> {
        // A panicking test thread must not hide the events from the others.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: ViewEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.lock().clone()
    }

    pub fn transcript(&self) -> Vec<(Sender, String)> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Transcript(sender, text) => Some((*sender, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Error banner text if the banner is currently visible.
    pub fn visible_error(&self) -> Option<String> {
        let mut visible = None;
        for event in self.lock().iter() {
            match event {
                ViewEvent::ErrorShown(text) => visible = Some(text.clone()),
                ViewEvent::MessagesHidden => visible = None,
                _ => {}
            }
        }
        visible
    }

    pub fn success_visible(&self) -> bool {
        let mut visible = false;
        for event in self.lock().iter() {
            match event {
                ViewEvent::SuccessShown => visible = true,
                ViewEvent::MessagesHidden => visible = false,
                _ => {}
            }
        }
        visible
    }

    pub fn chat_busy(&self) -> bool {
        self.lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                ViewEvent::ChatBusy(busy) => Some(*busy),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl View for RecordingView {
    fn append_transcript(&self, sender: Sender, text: &str) {
        self.push(ViewEvent::Transcript(sender, text.to_string()));
    }

    fn clear_chat_input(&self) {
        self.push(ViewEvent::ChatInputCleared);
    }

    fn set_chat_busy(&self, busy: bool) {
        self.push(ViewEvent::ChatBusy(busy));
    }

    fn show_success(&self) {
        self.push(ViewEvent::SuccessShown);
    }

    fn show_error(&self, message: &str) {
        self.push(ViewEvent::ErrorShown(message.to_string()));
    }

    fn hide_messages(&self) {
        self.push(ViewEvent::MessagesHidden);
    }

    fn scroll_into_view(&self, section: Section) {
        self.push(ViewEvent::Scrolled(section));
    }

    fn focus(&self, field: Field) {
        self.push(ViewEvent::Focused(field));
    }
}
