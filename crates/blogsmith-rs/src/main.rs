//! Command-line client for generating content and managing history.

use anyhow::{Context, anyhow, bail};
use blogsmith_rs::config::BlogsmithConfig;
use blogsmith_rs::core::{Blogsmith, HistoryStore, RemoveOutcome};
use blogsmith_rs::protocol::{
    ContentFilter, ContentRecord, ContentType, GenerationRequest, UserIdentity,
};
use blogsmith_rs::{Session, require_durable_history};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Command-line options for the Blogsmith client.
#[derive(Parser)]
#[command(
    name = "blogsmith",
    version,
    about = "Generate content with an LLM and keep a searchable history"
)]
struct Cli {
    /// Optional path to a blogsmith.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an email address
    Login { email: String },
    /// Sign out of the current session
    Logout,
    /// Print the signed-in email address
    Whoami,
    /// Generate a piece of content
    Generate {
        /// blog, tweet, email, or ad-copy
        #[arg(long = "type", default_value = "blog")]
        content_type: ContentType,
        /// Desired length, e.g. Short, Medium, Long
        #[arg(long)]
        length: String,
        /// Desired tone, e.g. Professional, Casual
        #[arg(long)]
        tone: String,
        /// What the content should be about
        #[arg(long)]
        prompt: String,
        /// Save the result to your history
        #[arg(long)]
        save: bool,
    },
    /// Browse and manage saved content
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved content, newest first
    List {
        /// Case-insensitive text to look for in prompts and content
        #[arg(long)]
        search: Option<String>,
        /// all, blog, tweet, email, or ad-copy
        #[arg(long = "type", default_value = "all")]
        filter: ContentFilter,
    },
    /// Print one saved item
    Show { id: String },
    /// Write one saved item to a text file
    Export {
        id: String,
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete one saved item
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blogsmith_rs::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let session_path = config
        .session_path()
        .context("unable to resolve session file path")?;

    match cli.command {
        Command::Login { email } => {
            let identity = UserIdentity::parse(&email).context("invalid email")?;
            Session::new(identity.clone()).save(&session_path)?;
            println!("Signed in as {identity}");
        }
        Command::Logout => {
            if Session::clear(&session_path)? {
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }
        Command::Whoami => match Session::load(&session_path)? {
            Some(session) => println!("{}", session.email),
            None => println!("Not signed in"),
        },
        Command::Generate {
            content_type,
            length,
            tone,
            prompt,
            save,
        } => {
            let user = require_user(&session_path)?;
            if save {
                require_durable_history(&config)?;
            }
            let blogsmith =
                Blogsmith::connect(config).context("failed to initialize generation")?;
            let request = GenerationRequest::new(content_type, length, tone, prompt);
            let text = blogsmith.gateway()?.generate(&request).await?;
            println!("{text}");
            if save {
                let store = blogsmith.history_store(user);
                let record = store.append(request.into_content(text)).await?;
                eprintln!("Saved to history (id={})", record.id);
            }
        }
        Command::History { action } => {
            let user = require_user(&session_path)?;
            require_durable_history(&config)?;
            let blogsmith =
                Blogsmith::connect_history(config).context("failed to open content history")?;
            let store = blogsmith.history_store(user);
            store.load().await?;
            run_history(&store, action).await?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BlogsmithConfig> {
    if let Some(path) = path {
        info!("loading config from path: {}", path.display());
        return BlogsmithConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("cwd")?;
    debug!("loading layered config from cwd: {}", cwd.display());
    let layered = BlogsmithConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn require_user(session_path: &Path) -> anyhow::Result<UserIdentity> {
    Session::load(session_path)?
        .map(|session| session.email)
        .context("not signed in; run `blogsmith login <email>` first")
}

async fn run_history(store: &HistoryStore, action: HistoryAction) -> anyhow::Result<()> {
    match action {
        HistoryAction::List { search, filter } => {
            let entries = store.query(search.as_deref().unwrap_or_default(), filter);
            if entries.is_empty() {
                println!("No content history found.");
            }
            for record in entries.iter().filter_map(|entry| entry.to_record()) {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id,
                    record.content.content_type.label(),
                    format_timestamp(&record),
                    record.content.prompt
                );
            }
        }
        HistoryAction::Show { id } => {
            let record = find(store, &id)?;
            println!("{} ({})", record.content.content_type.label(), record.id);
            println!("Created: {}", format_timestamp(&record));
            println!("Length: {}", record.content.length);
            println!("Tone: {}", record.content.tone);
            println!("Prompt: {}", record.content.prompt);
            println!();
            println!("{}", record.content.generated_content);
        }
        HistoryAction::Export { id, out } => {
            let record = find(store, &id)?;
            let dir = match out {
                Some(dir) => dir,
                None => std::env::current_dir().context("cwd")?,
            };
            let path = dir.join(record.export_file_name());
            std::fs::write(&path, &record.content.generated_content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
        HistoryAction::Delete { id } => match store.remove(&id).await? {
            RemoveOutcome::Removed => println!("Deleted {id}"),
            RemoveOutcome::NotFound => bail!("no content with id {id}"),
        },
    }
    Ok(())
}

fn find(store: &HistoryStore, id: &str) -> anyhow::Result<ContentRecord> {
    store
        .get(id)
        .ok_or_else(|| anyhow!("no content with id {id}"))
}

fn format_timestamp(record: &ContentRecord) -> String {
    record
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
