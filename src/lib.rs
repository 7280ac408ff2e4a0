pub mod chat;
pub mod cli;
pub mod concierge;
pub mod config;
pub mod error;
pub mod form;
pub mod history;
pub mod models;
pub mod session;
pub mod storage;
pub mod ui;
pub mod webhook;

use cli::{ Args, Command };
use chat::ChatOutcome;
use concierge::Concierge;
use config::Settings;
use error::ChatError;
use form::FormOutcome;
use history::{ format_history, ConversationLog };
use log::{ error, info, warn };
use session::IdentityStore;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };
use ui::ConsoleView;

/// Runs one command. Failures the view already rendered come back as
/// `ExitCode::FAILURE` rather than as an error, so each is reported once.
pub async fn run(args: Args) -> Result<ExitCode, Box<dyn Error + Send + Sync>> {
    let settings = Settings::from_args(&args)?;

    info!("--- Core Configuration ---");
    match &settings.webhook_url {
        Some(url) => info!("Webhook URL: {}", url),
        None => info!("Webhook URL: <not set>"),
    }
    info!("Request Timeout: {:?}", settings.request_timeout);
    info!("Store Type: {}", settings.store_type);
    info!("Store Path: {}", settings.store_path.display());
    info!("Store Redis URL: {}", settings.store_redis_url);
    info!("Reply Delay: {:?}", settings.delays.reply);
    info!("-------------------------");

    let succeeded = match args.command {
        Command::Chat { message } => {
            let concierge = Concierge::new(settings, Arc::new(ConsoleView::new()))?;
            match message {
                Some(text) => report_chat(concierge.send_chat_message(&text).await),
                None => {
                    chat_loop(&concierge).await?;
                    true
                }
            }
        }
        Command::Lead {
            full_name,
            email,
            service,
            automation_type,
            problem_description,
            budget,
            additional_notes,
        } => {
            let concierge = Concierge::new(settings, Arc::new(ConsoleView::new()))?;
            if let Some(service) = service {
                concierge.select_service(&service).await;
            }
            concierge.edit_form(|form| {
                form.full_name = full_name;
                form.email = email;
                if !automation_type.is_empty() {
                    form.automation_type = automation_type;
                }
                form.problem_description = problem_description;
                form.budget = budget;
                form.additional_notes = additional_notes;
            }).await;

            concierge.submit_lead().await == FormOutcome::Submitted
        }
        Command::Identity { set_name } => {
            let identity = IdentityStore::new(storage::initialize_store(&settings)?);
            if let Some(name) = set_name {
                identity.set_user_name(&name).await?;
            }
            let current = identity.identity().await?;
            println!("Visitor ID: {}", current.visitor_id);
            println!("Name: {}", current.user_name.as_deref().unwrap_or("<not set>"));
            true
        }
        Command::History { clear } => {
            let log = ConversationLog::new(storage::initialize_store(&settings)?);
            if clear {
                log.clear().await?;
                println!("Conversation history cleared.");
            } else {
                print!("{}", format_history(&log.load().await?));
            }
            true
        }
    };

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Whether the message went through. Webhook and storage failures were already
/// rendered in the transcript; only errors the view never saw are printed here.
fn report_chat(outcome: Result<ChatOutcome, ChatError>) -> bool {
    match outcome {
        Ok(ChatOutcome::Failed(_)) | Ok(ChatOutcome::NotSaved(_)) => false,
        Ok(_) => true,
        Err(ChatError::Busy) => {
            eprintln!("error: still waiting for the previous reply; message not sent.");
            false
        }
        Err(e) => {
            error!("Chat failed: {}", e);
            false
        }
    }
}

/// One message per stdin line. `/cancel` aborts the message being sent,
/// `/quit` (or end of input) exits.
async fn chat_loop(concierge: &Concierge) -> Result<(), Box<dyn Error + Send + Sync>> {
    let restored = concierge.chat().restore_transcript().await?;
    if restored > 0 {
        info!("Restored {} messages from history", restored);
    }
    println!("Type a message and press Enter. /cancel aborts a pending message, /quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut eof = false;

    while !eof {
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        match line.trim() {
            "/quit" => break,
            "/cancel" => {
                if !concierge.chat().cancel_pending() {
                    println!("Nothing to cancel.");
                }
            }
            text => {
                let sending = concierge.send_chat_message(text);
                tokio::pin!(sending);
                loop {
                    tokio::select! {
                        outcome = &mut sending => {
                            report_chat(outcome);
                            break;
                        }
                        next = lines.next_line(), if !eof => match next? {
                            Some(extra) if extra.trim() == "/cancel" => {
                                concierge.chat().cancel_pending();
                            }
                            Some(extra) if extra.trim() == "/quit" => {
                                concierge.chat().cancel_pending();
                                eof = true;
                            }
                            Some(extra) => {
                                report_chat(concierge.send_chat_message(&extra).await);
                            }
                            None => {
                                warn!("Input closed while a message is pending; waiting for the reply");
                                eof = true;
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
