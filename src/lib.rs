#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Todo Items
//!
//! A per-user to-do list service where every item has exactly one owner and
//! only that owner may see, edit or delete it.
//!
//! ## Overview
//!
//! Every request runs through one authorization state machine:
//!
//! - anonymous requests are sent to the sign-in page and never reach the store
//! - signed-in actors may list their own items and create new ones
//! - item-addressed requests additionally require ownership; foreign items and
//!   items that do not exist both send the actor back to the item list
//!
//! Authorization failures are ordinary [`controller::Outcome`] values rather
//! than errors. Only item store infrastructure failures surface as
//! [`error::ItemsError`].
//!
//! ## Module Organization
//!
//! - [`models`] - `Item` and `Actor`
//! - [`authorization`] - the ownership predicate
//! - [`store`] - item persistence (in-memory and PostgreSQL)
//! - [`session`] - session tokens and the current actor
//! - [`controller`] - authorization-scoped item operations
//! - [`web`] - Axum routes, middleware and handlers
//! - [`config`] - layered TOML and environment configuration
//! - [`logging`] - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todo_items::config::AppConfig;
//! use todo_items::session::{MemorySessionStore, SessionProvider};
//! use todo_items::web::{create_app, state::AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let sessions = Arc::new(MemorySessionStore::new(config.session.ttl()));
//! let state = AppState::build(config, sessions).await?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, create_app(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod authorization;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod web;

pub use authorization::{can_access, decide, AccessDecision, ItemAction};
pub use controller::{ItemAccessController, Outcome, Page};
pub use error::{ItemsError, Result};
pub use models::{Actor, Item};
pub use session::{CredentialVerifier, CurrentActor, SessionProvider, SessionToken};
pub use store::{ItemStore, StoreError};
