//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use wsreg_core::config;
use wsreg_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "wsreg")]
#[command(version)]
#[command(about = "Browse, register for, and rate conference workshops")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Log in with a conference ticket ID
    Login {
        #[arg(value_name = "TICKET_ID")]
        ticket_id: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in attendee
    Whoami,

    /// List workshops with remaining spots
    Workshops,
    /// Register for a workshop
    Register {
        #[arg(value_name = "WORKSHOP_ID")]
        workshop_id: String,
    },
    /// Withdraw from a workshop
    Withdraw {
        #[arg(value_name = "WORKSHOP_ID")]
        workshop_id: String,
    },
    /// List your registrations
    Mine,
    /// Rate a workshop you attended
    Rate {
        #[arg(value_name = "WORKSHOP_ID")]
        workshop_id: String,
        /// Content satisfaction (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        content: u8,
        /// Speaker effectiveness (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        speaker: u8,
        /// Whether you learned something new
        #[arg(long, value_enum)]
        learned: commands::rating::Learned,
        /// Optional free-text feedback
        #[arg(long, default_value = "")]
        feedback: String,
    },

    /// Admin dashboard commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

impl Commands {
    fn label(&self) -> &'static str {
        match self {
            Commands::Config { .. } => "config",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Workshops => "workshops",
            Commands::Register { .. } => "register",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Mine => "mine",
            Commands::Rate { .. } => "rate",
            Commands::Admin { .. } => "admin",
        }
    }
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Store the API base URL in the config file
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// List registrations for the workshops you manage
    Registrations,
    /// Show the ratings summary for a workshop
    Ratings {
        #[arg(value_name = "WORKSHOP_ID")]
        workshop_id: String,
    },
    /// Remove an attendee from a workshop
    Withdraw {
        #[arg(value_name = "TICKET_ID")]
        ticket_id: String,
        #[arg(value_name = "WORKSHOP_ID")]
        workshop_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands must work even when the file is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        return config_command(command);
    }

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init_file_logging(&config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {err:#}");
            None
        }
    };

    let Some(command) = cli.command else {
        return commands::tui::run(&config).await;
    };

    let label = command.label();
    tracing::debug!(command = label, "running command");
    let ctx = commands::Context::new(&config);
    let result = match command {
        Commands::Config { command } => config_command(&command),
        Commands::Login { ticket_id } => commands::session::login(&ctx, &ticket_id).await,
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Whoami => {
            commands::session::whoami(&ctx);
            Ok(())
        }
        Commands::Workshops => commands::workshops::list(&ctx).await,
        Commands::Register { workshop_id } => commands::workshops::register(&ctx, &workshop_id).await,
        Commands::Withdraw { workshop_id } => commands::workshops::withdraw(&ctx, &workshop_id).await,
        Commands::Mine => commands::workshops::mine(&ctx).await,
        Commands::Rate {
            workshop_id,
            content,
            speaker,
            learned,
            feedback,
        } => {
            commands::rating::rate(&ctx, &workshop_id, content, speaker, learned, feedback).await
        }
        Commands::Admin { command } => match command {
            AdminCommands::Registrations => commands::admin::registrations(&ctx).await,
            AdminCommands::Ratings { workshop_id } => {
                commands::admin::ratings(&ctx, &workshop_id).await
            }
            AdminCommands::Withdraw {
                ticket_id,
                workshop_id,
                yes,
            } => commands::admin::withdraw(&ctx, &ticket_id, &workshop_id, yes).await,
        },
    };
    if let Err(err) = &result {
        tracing::error!(command = label, error = %format!("{err:#}"), "command failed");
    }
    result
}

fn config_command(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetApiUrl { url } => commands::config::set_api_url(url),
    }
}
