//! The client-side application logic for the Halocoin wallet client:
//! session tracking, push-event routing and per-domain refresh dispatch.
//!
//! The render layer is not here. Widgets are headless: they own their data
//! domain, fetch it, and expose snapshots; whatever shell embeds this crate
//! subscribes to the session watch channel and the notification queue and
//! draws from the snapshots. Install a `tracing` subscriber in the shell to
//! see the crate's logs.

pub mod actions;
pub mod app;
pub mod dispatch;
pub mod notify;
pub mod probe;
pub mod router;
pub mod session;
pub mod widgets;

pub use crate::app::App;
pub use crate::session::SessionState;
