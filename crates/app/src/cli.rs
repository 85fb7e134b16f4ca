//! Command line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use techsolutions_core::{NewService, ServicePatch, SessionChoice, RELATED_LIMIT};

#[derive(Parser, Debug)]
#[command(name = "techsolutions-admin", version, about = "TechSolutions admin console")]
pub struct Cli {
    /// Directory holding the database and config.toml
    #[arg(long, global = true, env = "TECHSOLUTIONS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One line typed into the interactive shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in to the admin panel
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Keep the session for 30 days instead of this run
        #[arg(long)]
        remember: bool,
        /// What to do with a session that is already active
        #[arg(long, value_enum)]
        existing: Option<ExistingSession>,
    },
    /// End the current session
    Logout,
    /// Show session and lockout state
    Status,
    /// Clear failed login attempts and any lockout
    ResetAttempts,
    /// Manage the service catalog
    #[command(subcommand)]
    Services(ServicesCommand),
    /// Contract requests from clients
    #[command(subcommand)]
    Contracts(ContractsCommand),
    /// Print an Argon2 hash for an [[accounts]] entry
    HashPassword { password: Option<String> },
    /// Run commands interactively within a single session
    Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingSession {
    Continue,
    Discard,
}

impl From<ExistingSession> for SessionChoice {
    fn from(value: ExistingSession) -> Self {
        match value {
            ExistingSession::Continue => SessionChoice::Continue,
            ExistingSession::Discard => SessionChoice::Discard,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommand {
    /// List services (active only unless --all)
    List {
        #[arg(long)]
        all: bool,
    },
    Show {
        id: u32,
    },
    /// Search names and descriptions
    Search {
        query: String,
    },
    /// Other active services to suggest alongside one
    Related {
        id: u32,
        #[arg(long, default_value_t = RELATED_LIMIT)]
        limit: usize,
    },
    Add(AddServiceArgs),
    Update(UpdateServiceArgs),
    /// Hide a service from the public listing
    Deactivate {
        id: u32,
    },
    Activate {
        id: u32,
    },
    Toggle {
        id: u32,
    },
    /// Delete a service permanently
    Remove {
        id: u32,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddServiceArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: u64,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub image: String,
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
}

impl From<AddServiceArgs> for NewService {
    fn from(args: AddServiceArgs) -> Self {
        NewService::new(args.name, args.price)
            .with_description(args.description)
            .with_image(args.image)
            .with_quantity(args.quantity)
    }
}

#[derive(Args, Debug)]
pub struct UpdateServiceArgs {
    pub id: u32,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<u64>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub quantity: Option<u32>,
}

impl UpdateServiceArgs {
    pub fn patch(&self) -> ServicePatch {
        ServicePatch {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            image: self.image.clone(),
            quantity: self.quantity,
            active: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ContractsCommand {
    /// Ask to hire a service
    Submit {
        service_id: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Show every submitted request
    List,
}
