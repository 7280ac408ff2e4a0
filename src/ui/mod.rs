mod console;
mod recording;

pub use console::ConsoleView;
pub use recording::{ RecordingView, ViewEvent };

use log::debug;
use std::time::Duration;
use crate::models::chat::Sender;
use crate::models::lead::LeadForm;

/// Page regions that can be scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Form,
    SuccessMessage,
}

/// Form inputs that can receive focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProblemDescription,
}

/// Presentation surface the chat and form flows render into.
pub trait View: Send + Sync {
    fn append_transcript(&self, sender: Sender, text: &str);

    fn clear_chat_input(&self);

    /// Disables the send control while a message is outstanding.
    fn set_chat_busy(&self, busy: bool);

    fn show_success(&self);

    fn show_error(&self, message: &str);

    fn hide_messages(&self);

    fn scroll_into_view(&self, section: Section);

    fn focus(&self, field: Field);
}

/// A service card was clicked: preselect its automation type, bring the form up
/// and put the cursor in the problem description.
pub async fn select_service(form: &mut LeadForm, service: &str, view: &dyn View, focus_delay: Duration) {
    debug!("Service selected: {}", service);
    form.automation_type = service.to_string();
    view.scroll_into_view(Section::Form);
    tokio::time::sleep(focus_delay).await;
    view.focus(Field::ProblemDescription);
}
