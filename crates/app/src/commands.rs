//! Command handlers
//!
//! Each handler opens the core store it needs from `AppState`, performs one
//! operation, and prints the result.

use inquire::{Confirm, Password, Text};
use techsolutions_core::{
    hash_password, remaining_seconds, Clock, ContactDetails, LoginError, Session, SessionChoice,
    SessionStatus,
};

use crate::cli::{Command, ContractsCommand, ExistingSession, ServicesCommand};
use crate::display::{format_price, format_time, service_detail, service_table};
use crate::error::{AppError, Result};
use crate::shell;
use crate::state::AppState;

pub fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            remember,
            existing,
        } => login(state, username, password, remember, existing),
        Command::Logout => logout(state),
        Command::Status => status(state),
        Command::ResetAttempts => {
            state.guard()?.reset_attempts()?;
            println!("Failed login attempts cleared.");
            Ok(())
        }
        Command::Services(command) => services(state, command),
        Command::Contracts(command) => contracts(state, command),
        Command::HashPassword { password } => {
            let password = match password {
                Some(p) => p,
                None => Password::new("Password:").prompt()?,
            };
            println!("{}", hash_password(&password)?);
            Ok(())
        }
        Command::Shell => shell::run(state),
    }
}

fn login(
    state: &AppState,
    username: Option<String>,
    password: Option<String>,
    remember: bool,
    existing: Option<ExistingSession>,
) -> Result<()> {
    let mut guard = state.guard()?;

    match guard.check_session()? {
        SessionStatus::Valid(session) => {
            let choice = match existing {
                Some(choice) => SessionChoice::from(choice),
                None => {
                    let keep = Confirm::new(&format!(
                        "You already have an active session as {}. Continue with it?",
                        session.username
                    ))
                    .with_default(true)
                    .prompt()?;
                    if keep {
                        SessionChoice::Continue
                    } else {
                        SessionChoice::Discard
                    }
                }
            };
            if let SessionStatus::Valid(session) = guard.resolve_existing_session(choice)? {
                println!("Continuing as {}.", session.username);
                return Ok(());
            }
            println!("Previous session closed.");
        }
        SessionStatus::Expired => println!("Your session has expired. Please log in again."),
        SessionStatus::Absent => {}
    }

    // Don't ask for a password that would be rejected anyway
    if let Some(remaining) = guard.remaining_lockout() {
        return Err(LoginError::LockedOut {
            remaining_seconds: remaining_seconds(remaining),
        }
        .into());
    }

    let username = match username {
        Some(u) => u,
        None => Text::new("Username:").prompt()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new("Password:").without_confirmation().prompt()?,
    };

    let session = guard.attempt_login(&username, &password, remember)?;
    println!("Welcome, {}!", session.username);
    if session.remember {
        println!(
            "Session remembered until {}.",
            format_time(session.expires_at(guard.policy()))
        );
    }
    Ok(())
}

fn logout(state: &AppState) -> Result<()> {
    state.guard()?.logout()?;
    println!("Logged out.");
    Ok(())
}

fn status(state: &AppState) -> Result<()> {
    let guard = state.guard()?;

    match guard.check_session()? {
        SessionStatus::Valid(session) => println!(
            "Logged in as {} since {} (expires {}).",
            session.username,
            format_time(session.login_time),
            format_time(session.expires_at(guard.policy()))
        ),
        SessionStatus::Expired => println!("Session expired."),
        SessionStatus::Absent => println!("Not logged in."),
    }

    match guard.remaining_lockout() {
        Some(remaining) => println!(
            "Login locked for another {} minute(s).",
            remaining_seconds(remaining).div_ceil(60)
        ),
        None => println!(
            "Failed attempts: {}/{}.",
            guard.failure_count(),
            guard.policy().max_attempts
        ),
    }
    Ok(())
}

/// Admin gate for anything that changes or exposes private data
fn require_admin(state: &AppState) -> Result<Session> {
    Ok(state.guard()?.require_session()?)
}

fn services(state: &AppState, command: ServicesCommand) -> Result<()> {
    match command {
        ServicesCommand::List { all } => {
            let catalog = state.catalog()?;
            if all {
                require_admin(state)?;
                print!("{}", service_table(catalog.list_all()));
            } else {
                print!("{}", service_table(catalog.list_active()));
            }
        }
        ServicesCommand::Show { id } => {
            let catalog = state.catalog()?;
            print!("{}", service_detail(catalog.get(id)?));
        }
        ServicesCommand::Search { query } => {
            let catalog = state.catalog()?;
            print!("{}", service_table(catalog.search(&query)));
        }
        ServicesCommand::Related { id, limit } => {
            let catalog = state.catalog()?;
            catalog.get(id)?;
            let related = catalog.related(id, limit);
            if related.is_empty() {
                println!("No other services are available right now.");
            } else {
                print!("{}", service_table(related));
            }
        }
        ServicesCommand::Add(args) => {
            require_admin(state)?;
            let service = state.catalog()?.add(args.into())?;
            println!("Service #{} added.", service.id);
        }
        ServicesCommand::Update(args) => {
            require_admin(state)?;
            let patch = args.patch();
            if patch.is_empty() {
                return Err(AppError::Usage("nothing to update".to_string()));
            }
            let service = state.catalog()?.update(args.id, &patch)?;
            println!("Service #{} updated.", service.id);
        }
        ServicesCommand::Deactivate { id } => {
            require_admin(state)?;
            state.catalog()?.set_active(id, false)?;
            println!("Service #{id} deactivated.");
        }
        ServicesCommand::Activate { id } => {
            require_admin(state)?;
            state.catalog()?.set_active(id, true)?;
            println!("Service #{id} activated.");
        }
        ServicesCommand::Toggle { id } => {
            require_admin(state)?;
            let service = state.catalog()?.toggle_active(id)?;
            let label = if service.active { "activated" } else { "deactivated" };
            println!("Service #{id} {label}.");
        }
        ServicesCommand::Remove { id, yes } => {
            require_admin(state)?;
            let mut catalog = state.catalog()?;
            let name = catalog.get(id)?.name.clone();
            let confirmed = yes
                || Confirm::new(&format!("Delete \"{name}\" permanently?"))
                    .with_default(false)
                    .prompt()?;
            if !confirmed {
                println!("Nothing deleted.");
            } else if catalog.remove_permanently(id)? {
                println!("Service #{id} deleted.");
            }
        }
    }
    Ok(())
}

fn contracts(state: &AppState, command: ContractsCommand) -> Result<()> {
    match command {
        ContractsCommand::Submit {
            service_id,
            name,
            email,
            phone,
            message,
        } => {
            let catalog = state.catalog()?;
            let details = ContactDetails {
                name,
                email,
                phone,
                message,
            };
            let now = state.clock().now();
            let request = state.contracts().submit(&catalog, service_id, details, now)?;
            println!(
                "Thank you {}! Your request for \"{}\" has been sent.",
                request.client_name, request.service_name
            );
        }
        ContractsCommand::List => {
            require_admin(state)?;
            let requests = state.contracts().list()?;
            if requests.is_empty() {
                println!("No contract requests yet.");
            }
            for request in requests {
                println!(
                    "{}  {:<24} {:>12}  {} <{}>",
                    format_time(request.timestamp),
                    request.service_name,
                    format_price(request.service_price),
                    request.client_name,
                    request.client_email
                );
                if !request.client_message.is_empty() {
                    println!("      {}", request.client_message);
                }
            }
        }
    }
    Ok(())
}
