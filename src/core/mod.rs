//! # Core Session Logic
//!
//! This module contains the chat session's business logic.
//! It knows nothing about terminals or timers.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • Action (intents)     │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No timers.     │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │        RUNTIME          │
//!                    │  SessionDriver +        │
//!                    │  Scheduler (tokio or    │
//!                    │  virtual time)          │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Session` struct, all session state in one place
//! - [`action`]: The `Action` enum and `update()`, everything that can happen
//! - [`timeline`]: Append-only message log
//! - [`interests`]: Bounded interest tags
//! - [`peer`]: Simulated remote party and the online counter
//! - [`random`]: Injectable random source
//! - [`config`]: Settings and variant switches

pub mod action;
pub mod config;
pub mod interests;
pub mod peer;
pub mod random;
pub mod state;
pub mod timeline;
