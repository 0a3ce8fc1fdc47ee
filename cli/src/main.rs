// farewell: command-line and HTTP front end for the class farewell store
//
// Cross-platform (macOS, Linux, Windows). Data lives in a sled database under the
// platform data directory unless `storage_path` is configured.

mod auth;
mod config;
mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use farewell_core::{Contact, FarewellStore, Memory, NewContact, NewMemory, QuoteDeck};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "farewell")]
#[command(about = "Class farewell: memories, names and contacts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered classmate names
    Names {
        #[command(subcommand)]
        action: NamesAction,
    },
    /// Post, list and delete memories
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Share and browse contacts
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Show whose birthday is coming up next
    Birthday,
    /// Print a random quote
    Quote {
        /// Pick from the birthday wishes instead
        #[arg(short, long)]
        birthday: bool,
    },
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Serve the JSON API behind basic auth
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum NamesAction {
    List,
    Register { name: String },
    Search { query: String },
}

#[derive(Subcommand)]
enum MemoryAction {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    Post {
        #[arg(long)]
        from: String,
        /// Recipient; omit with --personal
        #[arg(long)]
        to: Option<String>,
        message: String,
        /// A note about your own experience, addressed to yourself
        #[arg(long)]
        personal: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum ContactAction {
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    Add {
        name: String,
        phone: String,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        social: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Make the contact visible to everyone, not only classmates
        #[arg(long)]
        public: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Names { action } => cmd_names(action).await,
        Commands::Memory { action } => cmd_memory(action).await,
        Commands::Contact { action } => cmd_contact(action).await,
        Commands::Birthday => cmd_birthday().await,
        Commands::Quote { birthday } => cmd_quote(birthday).await,
        Commands::Config { action } => cmd_config(action).await,
        Commands::Serve { port } => cmd_serve(port).await,
    }
}

fn open_store(config: &config::Config) -> Result<FarewellStore> {
    let path = config.resolve_storage_path()?;
    let path = path
        .to_str()
        .context("Storage path is not valid UTF-8")?
        .to_string();
    FarewellStore::with_storage(&path).context("Failed to open farewell storage")
}

fn format_timestamp(millis: u64) -> String {
    chrono::DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn print_memory(memory: &Memory) {
    if memory.is_personal() {
        println!(
            "  {} {} {}",
            "•".bright_magenta(),
            memory.from.bright_cyan(),
            "(personal)".dimmed()
        );
    } else {
        println!(
            "  {} {} → {}",
            "•".bright_magenta(),
            memory.from.bright_cyan(),
            memory.to.bright_cyan()
        );
    }
    println!("    {}", memory.message);
    println!(
        "    {} {}",
        format_timestamp(memory.timestamp).dimmed(),
        memory.id.dimmed()
    );
}

fn print_contact(contact: &Contact) {
    println!("  {} {}", "•".bright_green(), contact.name.bright_cyan());
    println!("    Phone:  {}", contact.phone);
    if let Some(ref dob) = contact.dob {
        println!("    Born:   {}", dob);
    }
    if let Some(ref email) = contact.email {
        println!("    Email:  {}", email);
    }
    if let Some(ref social) = contact.social {
        println!("    Social: {}", social);
    }
    if let Some(ref city) = contact.city {
        println!("    City:   {}", city);
    }
    if contact.classmates_only {
        println!("    {}", "classmates only".dimmed());
    }
}

async fn cmd_names(action: NamesAction) -> Result<()> {
    let config = config::Config::load()?;
    let store = open_store(&config)?;

    let (title, names) = match action {
        NamesAction::List => ("Registered Names", store.list_registered_names()),
        NamesAction::Register { name } => {
            if name.trim().is_empty() {
                anyhow::bail!("Name cannot be empty");
            }
            let names = store.register_name(&name)?;
            store.flush()?;
            println!("{} Registered {}", "✓".green(), name.trim().bright_cyan());
            println!();
            ("Registered Names", names)
        }
        NamesAction::Search { query } => ("Matching Names", store.search_registered_names(&query)),
    };

    if names.is_empty() {
        println!("{}", "No names yet.".dimmed());
    } else {
        println!("{} ({} total)", title.bold(), names.len());
        for name in names {
            println!("  {} {}", "•".bright_green(), name);
        }
    }

    Ok(())
}

async fn cmd_memory(action: MemoryAction) -> Result<()> {
    let config = config::Config::load()?;
    let store = open_store(&config)?;

    match action {
        MemoryAction::List { search } => {
            let memories = match search {
                Some(ref q) => store.search_memories(q),
                None => store.list_memories(),
            };

            if memories.is_empty() {
                println!("{}", "No memories yet.".dimmed());
            } else {
                println!("{} ({} total)", "Wall of Memories".bold(), memories.len());
                println!();
                for memory in &memories {
                    print_memory(memory);
                    println!();
                }
            }
        }

        MemoryAction::Post {
            from,
            to,
            message,
            personal,
        } => {
            let input = if personal {
                NewMemory::personal(from, message)
            } else {
                NewMemory::new(from, to.unwrap_or_default(), message)
            };
            let input = input.validate()?;
            let saved = store.save_memory(input)?;
            store.flush()?;

            println!("{} Memory saved", "✓".green());
            print_memory(&saved);
        }

        MemoryAction::Delete { id } => {
            let before = store.list_memories().len();
            let remaining = store.delete_memory(&id)?;
            store.flush()?;

            if remaining.len() < before {
                println!("{} Deleted memory {}", "✓".green(), id.dimmed());
            } else {
                println!("{}", "No memory with that id.".dimmed());
            }
        }
    }

    Ok(())
}

async fn cmd_contact(action: ContactAction) -> Result<()> {
    let config = config::Config::load()?;
    let store = open_store(&config)?;

    match action {
        ContactAction::List { search } => {
            let contacts = match search {
                Some(ref q) => store.search_contacts(q),
                None => store.list_contacts(),
            };

            if contacts.is_empty() {
                println!("{}", "No contacts yet.".dimmed());
            } else {
                println!("{} ({} total)", "Contact Vault".bold(), contacts.len());
                println!();
                for contact in &contacts {
                    print_contact(contact);
                }
            }
        }

        ContactAction::Add {
            name,
            phone,
            dob,
            email,
            social,
            city,
            public,
        } => {
            let input = NewContact {
                name,
                phone,
                dob,
                email,
                social,
                city,
                classmates_only: !public,
            }
            .validate()?;
            let saved = store.save_contact(input)?;
            store.flush()?;

            println!("{} Contact added:", "✓".green());
            print_contact(&saved);
        }
    }

    Ok(())
}

async fn cmd_birthday() -> Result<()> {
    let config = config::Config::load()?;
    let store = open_store(&config)?;

    match store.upcoming_birthday() {
        Some(upcoming) => {
            let when = match upcoming.days_until {
                0 => "today!".to_string(),
                1 => "tomorrow".to_string(),
                n => format!("in {} days", n),
            };
            println!(
                "{} {}'s birthday is {}",
                "🎂".bold(),
                upcoming.contact.name.bright_cyan(),
                when.bright_yellow()
            );
            if let Some(wish) = QuoteDeck::birthday().next_quote() {
                println!("   {}", wish.italic());
            }
        }
        None => println!("{}", "No birthdays on file yet.".dimmed()),
    }

    Ok(())
}

async fn cmd_quote(birthday: bool) -> Result<()> {
    let mut deck = if birthday {
        QuoteDeck::birthday()
    } else {
        QuoteDeck::friendship()
    };

    if let Some(quote) = deck.next_quote() {
        println!("\"{}\"", quote.italic());
    }
    Ok(())
}

async fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = config::Config::load()?;

    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => {
            if let Some(value) = config.get(&key) {
                println!("{} = {}", key.bright_cyan(), value);
            } else {
                anyhow::bail!("Unknown config key: {}", key);
            }
        }

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<20} {}", key.bright_cyan(), value);
            }
        }
    }

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<()> {
    let config = config::Config::load()?;
    let port = port.unwrap_or(config.listen_port);
    let store = open_store(&config)?;

    let credentials = auth::Credentials::new(config.auth.user.clone(), config.auth.password.clone());
    let ctx = Arc::new(server::WebContext::new(store, credentials));

    println!("{}", "Farewell - starting...".bold());
    println!(
        "  {} Storage: {}",
        "✓".green(),
        config.resolve_storage_path()?.display()
    );
    println!("  {} Basic auth user: {}", "✓".green(), config.auth.user.bright_cyan());
    println!();

    server::start(port, ctx).await;
    Ok(())
}
