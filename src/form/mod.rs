use log::{ info, warn };
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use crate::error::{ ValidationError, WebhookError };
use crate::models::lead::{ LeadForm, LeadSubmission };
use crate::models::webhook::WebhookPayload;
use crate::ui::{ Section, View };
use crate::webhook::{ deliver, WebhookClient };

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Invalid(ValidationError),
    Submitted,
    Failed(WebhookError),
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate(form: &LeadForm) -> Result<(), ValidationError> {
    let missing = form.missing_required();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    if !is_valid_email(form.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn failure_message(err: &WebhookError) -> String {
    match err {
        WebhookError::HttpStatus(status) =>
            format!("Failed to submit the form (status {}). Please try again.", status),
        WebhookError::Transport(reason) =>
            format!("An error occurred while submitting the form: {}. Please try again.", reason),
    }
}

/// Validates and sends the form. The form is cleared only after a 2xx; on any
/// failure the entered values stay so the visitor can try again.
pub async fn submit_lead(
    form: &mut LeadForm,
    client: &dyn WebhookClient,
    view: &dyn View,
    success_scroll_delay: Duration
) -> FormOutcome {
    if let Err(err) = validate(form) {
        info!("Lead form rejected: {:?}", err);
        view.show_error(&err.to_string());
        return FormOutcome::Invalid(err);
    }

    view.hide_messages();

    let payload = WebhookPayload::Form(LeadSubmission::from_form(form));
    match deliver(client, &payload).await {
        Ok(_) => {
            info!("Lead submitted to {}", client.endpoint());
            view.show_success();
            form.reset();
            tokio::time::sleep(success_scroll_delay).await;
            view.scroll_into_view(Section::SuccessMessage);
            FormOutcome::Submitted
        }
        Err(err) => {
            warn!("Lead submission failed: {}", err);
            view.show_error(&failure_message(&err));
            FormOutcome::Failed(err)
        }
    }
}
