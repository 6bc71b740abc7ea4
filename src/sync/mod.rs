//! Two-pane synchronization core.
//!
//! Leaves first: [`pane`] holds per-buffer state, [`direction`] tracks which
//! buffer is authoritative, [`scheduler`] is the idle poll, [`dispatch`]
//! moves requests off the UI thread, and [`controller`] ties them together.

pub mod controller;
pub mod direction;
pub mod dispatch;
pub mod pane;
pub mod scheduler;

pub use controller::{DiagnosticsSink, NullSink, SyncController, SyncOutcome};
pub use direction::{Direction, FocusTracker};
pub use dispatch::{
    BackgroundDispatcher, Completion, Dispatcher, RequestId, TranslationRequest,
};
pub use pane::{Origin, Pane, PaneId};
pub use scheduler::IdleScheduler;
