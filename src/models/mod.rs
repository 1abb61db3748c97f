//! Data models for the service-ticket API.
//!
//! - `Ticket`, `TicketRequest`: service tickets and their creation payload
//! - `User`, `Role`: application users and access roles
//! - `TokenResponse`, `LoginRequest`, `RegisterRequest`: auth wire types

pub mod ticket;
pub mod user;

pub use ticket::{Ticket, TicketRequest};
pub use user::{LoginRequest, RegisterRequest, Role, TokenResponse, User};
