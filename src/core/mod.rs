//! # Core Application Logic
//!
//! This module contains the client's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • format() (messages)  │
//!                    │  • resize() (inputs)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`conversation`]: The append-only message log
//! - [`format`]: Raw message text to display HTML
//! - [`autogrow`]: Height rule for inputs that grow with their content
//! - [`config`]: Settings file, env vars and CLI overrides

pub mod action;
pub mod autogrow;
pub mod config;
pub mod conversation;
pub mod format;
pub mod state;
