//! Application boundary: command dispatch, the login flow, and the
//! reaction to the client's `Unauthorized` signal.
//!
//! The API client itself only reports a 401 as a typed error; deciding
//! what to do about it (clear the session and send the user back through
//! the login entry point) happens here, at the boundary.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, Session, SessionData, SharedSession};
use crate::config::{self, Config};
use crate::models::{RegisterRequest, Role, Ticket, TicketRequest, User};
use crate::utils::{is_valid_cpf, truncate_string};

/// What the boundary should do about a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Clear the session and send the user back to the login flow.
    Reauthenticate,
    /// Surface the error unchanged; no session action.
    Surface,
}

/// Only the unauthorized signal forces re-login; every other failure,
/// transport errors included, propagates untouched.
pub fn recovery_for(error: &ApiError) -> Recovery {
    if error.is_unauthorized() {
        Recovery::Reauthenticate
    } else {
        Recovery::Surface
    }
}

/// Act on a failed API call per its `Recovery`: reauthentication clears
/// the session, and the error always propagates to the caller - the
/// side effect is layered on top of error propagation, never a
/// substitute for it.
fn apply_recovery<T>(session: &SharedSession, result: Result<T, ApiError>) -> Result<T> {
    match result {
        Err(e) if recovery_for(&e) == Recovery::Reauthenticate => {
            warn!("Unauthorized response, clearing session");
            if let Err(clear_err) = session.clear() {
                warn!(error = %clear_err, "Failed to clear session");
            }
            eprintln!("Session expired or invalid - run `deskline login` to sign in again.");
            Err(e.into())
        }
        other => other.map_err(Into::into),
    }
}

pub struct App {
    pub config: Config,
    pub session: SharedSession,
    pub api: ApiClient,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let cache_dir = config.cache_dir()?;

        let mut session = Session::new(cache_dir);
        let loaded = session.load();
        debug!(?loaded, "Session loaded");

        let session = SharedSession::new(session);
        let base_url = config::api_base_url();
        info!(base_url = %base_url, "API client configured");

        let api = ApiClient::new(base_url, Arc::new(session.clone()))?;

        Ok(Self {
            config,
            session,
            api,
        })
    }

    pub async fn run(&mut self, args: &[String]) -> Result<()> {
        let parts: Vec<&str> = args.iter().map(String::as_str).collect();
        match parts.as_slice() {
            ["login"] => self.login_interactive().await,
            ["logout"] => self.logout(),
            ["status"] => self.status(),
            ["register", username, role] => self.register(username, role).await,
            ["ticket", "create", name, cpf, kind, description @ ..] if !description.is_empty() => {
                self.create_ticket(name, cpf, kind, &description.join(" ")).await
            }
            ["ticket", "cpf", cpf] => self.tickets_by_cpf(cpf).await,
            ["ticket", "protocol", protocolo] => self.ticket_by_protocol(protocolo).await,
            ["supervisor", "list"] => self.list_all_tickets().await,
            ["supervisor", "edit", id, description @ ..] if !description.is_empty() => {
                self.edit_ticket(id, &description.join(" ")).await
            }
            ["supervisor", "agent", id] => self.tickets_by_agent(id).await,
            ["admin", "users"] => self.list_users(false).await,
            ["admin", "blocked"] => self.list_users(true).await,
            ["admin", "block", id] => self.block_user(id).await,
            _ => {
                print_usage();
                Ok(())
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the user holds a non-expired session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Interactive login: prompt for credentials, authenticate, persist
    /// the session and remember the username.
    pub async fn login_interactive(&mut self) -> Result<()> {
        // Non-interactive use (scripts, CI) can supply both via env
        let env_username = std::env::var("DESKLINE_USERNAME").ok().filter(|s| !s.is_empty());
        let env_password = std::env::var("DESKLINE_PASSWORD").ok().filter(|s| !s.is_empty());

        let (username, password) = match (env_username, env_password) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                println!("\n=== Deskline Login ===\n");
                let username = self.prompt_username()?;
                let password = Self::prompt_password(&username)?;
                (username, password)
            }
        };

        println!("Authenticating...");
        let token = self.api.login(&username, &password).await?;

        if let Err(e) = CredentialStore::store(&username, &password) {
            warn!(error = %e, "Failed to store credentials");
        }

        self.config.last_username = Some(username.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        self.session.update(SessionData {
            token: token.token,
            username,
            expires_in: token.expires_in,
            created_at: Utc::now(),
        });
        self.session.save()?;

        info!("Login successful");
        println!("Login successful!");
        Ok(())
    }

    /// Clear the persisted session
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear()?;
        println!("Logged out.");
        Ok(())
    }

    fn status(&self) -> Result<()> {
        println!("API: {}", self.api.base_url());
        match self.session.username() {
            Some(username) if self.is_authenticated() => {
                println!("Logged in as {}", username);
            }
            Some(username) => {
                println!("Session for {} has expired - run `deskline login`", username);
            }
            None => println!("Not logged in - run `deskline login`"),
        }
        Ok(())
    }

    fn prompt_username(&self) -> Result<String> {
        let default = self.config.last_username.clone();
        match default {
            Some(ref last_user) => {
                print!("Username [{}]: ", last_user);
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                let input = input.trim();

                if input.is_empty() {
                    Ok(last_user.clone())
                } else {
                    Ok(input.to_string())
                }
            }
            None => {
                print!("Username: ");
                io::stdout().flush()?;

                let mut username = String::new();
                io::stdin().read_line(&mut username)?;
                Ok(username.trim().to_string())
            }
        }
    }

    fn prompt_password(username: &str) -> Result<String> {
        if CredentialStore::has_credentials(username) {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if input.trim().to_lowercase() != "n" {
                return CredentialStore::get_password(username);
            }
        }
        Ok(rpassword::prompt_password("Password: ")?)
    }

    /// Apply the boundary policy to an API result: an unauthorized
    /// response clears the session and points the user at the login
    /// flow, then the error still propagates to the caller.
    fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T> {
        apply_recovery(&self.session, result)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    async fn register(&self, username: &str, role: &str) -> Result<()> {
        let role = Role::parse(role)
            .with_context(|| format!("Unknown role '{}' (user, admin, supervisor)", role))?;
        let password = rpassword::prompt_password("Password for new user: ")?;

        let request = RegisterRequest {
            username: username.to_string(),
            password,
            role,
        };
        let message = self.guard(self.api.register(&request).await)?;
        println!("{}", message);
        Ok(())
    }

    async fn create_ticket(
        &self,
        name: &str,
        cpf: &str,
        kind: &str,
        description: &str,
    ) -> Result<()> {
        if !is_valid_cpf(cpf) {
            anyhow::bail!("'{}' is not a valid CPF", cpf);
        }

        let request = TicketRequest {
            customer_name: name.to_string(),
            cpf: cpf.chars().filter(|c| c.is_ascii_digit()).collect(),
            description: description.to_string(),
            kind: kind.to_string(),
        };
        let ticket = self.guard(self.api.create_ticket(&request).await)?;
        println!("Ticket created. Protocol: {}", ticket.protocolo);
        Ok(())
    }

    async fn tickets_by_cpf(&self, cpf: &str) -> Result<()> {
        let tickets = self.guard(self.api.tickets_by_cpf(cpf).await)?;
        print_tickets(&tickets);
        Ok(())
    }

    async fn ticket_by_protocol(&self, protocolo: &str) -> Result<()> {
        let ticket = self.guard(self.api.ticket_by_protocol(protocolo).await)?;
        print_ticket_detail(&ticket);
        Ok(())
    }

    async fn list_all_tickets(&self) -> Result<()> {
        let tickets = self.guard(self.api.all_tickets().await)?;
        print_tickets(&tickets);
        Ok(())
    }

    async fn edit_ticket(&self, id: &str, description: &str) -> Result<()> {
        let id: i64 = id.parse().context("Ticket id must be a number")?;
        let message = self
            .guard(self.api.update_ticket_description(id, description).await)?;
        println!("{}", message);
        Ok(())
    }

    async fn tickets_by_agent(&self, id: &str) -> Result<()> {
        let id: i64 = id.parse().context("Agent id must be a number")?;
        let tickets = self.guard(self.api.tickets_by_agent(id).await)?;
        if tickets.is_empty() {
            println!("No tickets for agent {}", id);
        } else {
            print_tickets(&tickets);
        }
        Ok(())
    }

    async fn list_users(&self, blocked_only: bool) -> Result<()> {
        let users = if blocked_only {
            self.guard(self.api.list_blocked_users().await)?
        } else {
            self.guard(self.api.list_users().await)?
        };

        if users.is_empty() {
            println!("No users found.");
            return Ok(());
        }
        print_users(&users);
        Ok(())
    }

    async fn block_user(&self, id: &str) -> Result<()> {
        let id: i64 = id.parse().context("User id must be a number")?;
        let message = self.guard(self.api.block_user(id).await)?;
        println!("{}", message);
        Ok(())
    }
}

fn print_tickets(tickets: &[Ticket]) {
    println!(
        "{:<38} {:<20} {:<15} {:<12} {:<16} DESCRIPTION",
        "PROTOCOL", "CUSTOMER", "CPF", "TYPE", "CREATED"
    );
    for ticket in tickets {
        println!(
            "{:<38} {:<20} {:<15} {:<12} {:<16} {}",
            ticket.protocolo,
            truncate_string(&ticket.customer_name, 20),
            ticket.cpf_display(),
            truncate_string(&ticket.kind, 12),
            ticket.created_display(),
            truncate_string(&ticket.description, 40),
        );
    }
}

fn print_ticket_detail(ticket: &Ticket) {
    println!("Protocol:  {}", ticket.protocolo);
    println!("Customer:  {}", ticket.customer_name);
    println!("CPF:       {}", ticket.cpf_display());
    println!("Type:      {}", ticket.kind);
    println!("Created:   {}", ticket.created_display());
    println!("Description:\n  {}", ticket.description);
}

fn print_users(users: &[User]) {
    println!("{:<6} {:<20} {:<14} LOCKED", "ID", "USERNAME", "ROLE");
    for user in users {
        println!(
            "{:<6} {:<20} {:<14} {}",
            user.id,
            truncate_string(&user.username, 20),
            user.role.display_name(),
            if user.is_locked { "yes" } else { "no" },
        );
    }
}

pub fn print_usage() {
    println!("Usage: deskline <command>");
    println!();
    println!("Commands:");
    println!("  login                                     Sign in and store the session");
    println!("  logout                                    Clear the stored session");
    println!("  status                                    Show session and API address");
    println!("  register <username> <role>                Register a new user");
    println!("  ticket create <name> <cpf> <type> <description...>");
    println!("  ticket cpf <cpf>                          List tickets for a customer CPF");
    println!("  ticket protocol <protocol>                Show a ticket by protocol number");
    println!("  supervisor list                           List all tickets");
    println!("  supervisor edit <id> <description...>     Update a ticket description");
    println!("  supervisor agent <id>                     List tickets registered by an agent");
    println!("  admin users                               List all users");
    println!("  admin blocked                             List locked users");
    println!("  admin block <id>                          Lock a user account");
}
