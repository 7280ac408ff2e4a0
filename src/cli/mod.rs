use clap::{ Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Webhook Args ---
    /// Webhook endpoint receiving chat and form submissions (e.g., https://n8n.example.com/webhook/<id>)
    #[arg(long, env = "WEBHOOK_URL", global = true)]
    pub webhook_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30", global = true)]
    pub request_timeout_secs: u64,

    // --- Storage Args ---
    /// Where visitor state is persisted (file, memory, redis)
    #[arg(long, env = "STORE_TYPE", default_value = "file", global = true)]
    pub store_type: String,

    /// JSON file used by the file store.
    #[arg(long, env = "STORE_PATH", default_value = ".lead-concierge/storage.json", global = true)]
    pub store_path: String,

    /// Redis endpoint used by the redis store (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "STORE_REDIS_URL", default_value = "redis://127.0.0.1:6379", global = true)]
    pub store_redis_url: String,

    /// Prefix for Redis keys.
    #[arg(long, env = "STORE_REDIS_PREFIX", default_value = "concierge:", global = true)]
    pub store_redis_prefix: String,

    // --- Presentation Args ---
    /// Delay before a bot reply is shown, in milliseconds.
    #[arg(long, env = "REPLY_DELAY_MS", default_value = "500", global = true)]
    pub reply_delay_ms: u64,

    /// Delay before the success banner is scrolled into view, in milliseconds.
    #[arg(long, env = "SUCCESS_SCROLL_DELAY_MS", default_value = "100", global = true)]
    pub success_scroll_delay_ms: u64,

    /// Delay before the problem description is focused after picking a service, in milliseconds.
    #[arg(long, env = "FOCUS_DELAY_MS", default_value = "500", global = true)]
    pub focus_delay_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Chat with the webhook. Without --message, reads one message per line from stdin.
    Chat {
        /// Send a single message and exit.
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Submit the lead-capture form.
    Lead {
        #[arg(long, default_value = "")]
        full_name: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Pick a service card; prefills the automation type.
        #[arg(long, conflicts_with = "automation_type")]
        service: Option<String>,

        /// Automation type chosen directly in the form.
        #[arg(long, default_value = "")]
        automation_type: String,

        #[arg(long = "problem", default_value = "")]
        problem_description: String,

        #[arg(long, default_value = "")]
        budget: String,

        #[arg(long = "notes", default_value = "")]
        additional_notes: String,
    },

    /// Show the visitor identity.
    Identity {
        /// Store a display name sent along with chat messages. An empty value clears it.
        #[arg(long)]
        set_name: Option<String>,
    },

    /// Show the persisted conversation history.
    History {
        /// Remove the stored history instead.
        #[arg(long, default_value = "false")]
        clear: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lead_with_service() {
        let args = Args::try_parse_from([
            "lead-concierge",
            "lead",
            "--full-name",
            "Ada",
            "--email",
            "ada@example.com",
            "--service",
            "email-automation",
            "--problem",
            "Too many inboxes",
        ])
        .unwrap();
        match args.command {
            Command::Lead { full_name, service, problem_description, budget, .. } => {
                assert_eq!(full_name, "Ada");
                assert_eq!(service.as_deref(), Some("email-automation"));
                assert_eq!(problem_description, "Too many inboxes");
                assert_eq!(budget, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn service_conflicts_with_automation_type() {
        let result = Args::try_parse_from([
            "lead-concierge",
            "lead",
            "--service",
            "crm",
            "--automation-type",
            "email",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "lead-concierge",
            "chat",
            "--message",
            "hi",
            "--store-type",
            "memory",
        ])
        .unwrap();
        assert_eq!(args.store_type, "memory");
        assert!(matches!(args.command, Command::Chat { message: Some(ref m) } if m == "hi"));
    }
}
