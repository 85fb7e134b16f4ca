//! Interactive console
//!
//! Keeps one `AppState` alive so sessions created without "remember me"
//! last until the shell exits.

use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::cli::{Command, ShellLine};
use crate::commands;
use crate::error::Result;
use crate::state::AppState;

pub fn run(state: &AppState) -> Result<()> {
    println!("TechSolutions admin shell. Type `help` for commands, `exit` to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("admin> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let args = match split_args(&line) {
            Ok(args) => args,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        match args.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            _ => {}
        }

        let parsed = match ShellLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Covers `help` and `--help` as well as real mistakes
                let _ = e.print();
                continue;
            }
        };

        if matches!(parsed.command, Command::Shell) {
            println!("Already in the shell.");
            continue;
        }
        if let Err(e) = commands::run(state, parsed.command) {
            tracing::debug!(error = ?e, "Shell command failed");
            eprintln!("error: {e}");
        }
    }
    Ok(())
}

/// Split a line on whitespace, honouring single and double quotes
pub fn split_args(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_arg = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}
