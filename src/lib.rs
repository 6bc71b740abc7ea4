//! dmnt-sync: a two-pane terminal editor that keeps a dmnt cheat listing and
//! its disassembly in step through a remote translation service.
//!
//! The sync rules live in [`sync`] and have no terminal dependency; the rest
//! of the crate is the ratatui front end around them.

pub mod actions;
pub mod app;
pub mod client;
pub mod clipboard;
pub mod clock;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod state;
pub mod store;
pub mod sync;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
