use log::{ debug, info };
use std::io::Write;
use crate::models::chat::Sender;
use super::{ Field, Section, View };

/// Renders the transcript and banners on stdout/stderr for the command line.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self
    }
}

impl View for ConsoleView {
    fn append_transcript(&self, sender: Sender, text: &str) {
        let label = match sender {
            Sender::User => "you",
            Sender::Bot => "bot",
        };
        println!("[{}] {}", label, text);
        let _ = std::io::stdout().flush();
    }

    fn clear_chat_input(&self) {}

    fn set_chat_busy(&self, busy: bool) {
        if busy {
            debug!("Waiting for the webhook...");
        }
    }

    fn show_success(&self) {
        println!("Thank you! Your request has been submitted. We'll be in touch soon.");
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn hide_messages(&self) {}

    fn scroll_into_view(&self, section: Section) {
        debug!("scroll into view: {:?}", section);
    }

    fn focus(&self, field: Field) {
        match field {
            Field::ProblemDescription => info!("Next, describe the problem you want automated."),
        }
    }
}
