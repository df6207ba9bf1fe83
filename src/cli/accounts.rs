//! Account commands: login, register, logout

use crate::api::{LoginRequest, SignupRequest};
use crate::cli::{Console, LoginArgs, RegisterArgs};
use colored::Colorize;
use std::io::{BufRead, Write};

/// Read a line from stdin after printing a prompt to stderr.
fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    eprint!("{}: ", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Handle login command
pub async fn handle_login(
    args: &LoginArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt("Password")?,
    };

    let request = LoginRequest {
        email: args.email.clone(),
        password,
    };
    let token = console.client.login(&request).await?;
    console.session.login(&token)?;

    Ok(format!("Logged in as {}", args.email.bold()))
}

/// Handle register command
pub async fn handle_register(
    args: &RegisterArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let (password, password2) = match &args.password {
        Some(p) => (p.clone(), p.clone()),
        None => (prompt("Password")?, prompt("Confirm password")?),
    };

    let request = SignupRequest {
        email: args.email.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        password,
        password2,
    };
    let token = console.client.signup(&request).await?;

    let mut message = format!("Account created for {}", args.email.bold());
    if let Some(token) = token {
        console.session.login(&token)?;
        message.push_str(" (logged in)");
    } else {
        message.push_str("\nRun `statushawk login` to sign in.");
    }
    Ok(message)
}

/// Handle logout command
pub fn handle_logout(console: &Console) -> Result<String, Box<dyn std::error::Error>> {
    if !console.session.is_authenticated() {
        return Ok("Not logged in.".to_string());
    }
    console.session.logout()?;
    Ok("Logged out.".to_string())
}
