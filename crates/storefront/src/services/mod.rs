//! Collaborator service clients.
//!
//! These sit outside the cart/checkout core: the chat relay is a stateless
//! pass-through to the backend's assistant endpoint, and the auth service
//! handles login and bearer-token installation.

pub mod auth;
pub mod chat;

pub use auth::{AuthError, AuthService, AuthSession, UserProfile};
pub use chat::{ChatError, ChatRelay, ChatRole, ChatTurn};
