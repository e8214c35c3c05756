// Library exports for testing and embedding
//
// # Mutex Usage Policy
//
// moebius uses two mutex types:
//
//   - `parking_lot::Mutex`: the session registry and other shared host
//     state. Held only for short synchronous sections and never across
//     an `.await`.
//
//   - `tokio::sync::Mutex`: the per-session modal lane. Held across the
//     awaits of a modal show/close so requests for one session run one
//     after another.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod backend;
pub mod cli;
pub mod debug;
pub mod menu;
pub mod messages;
pub mod pages;
pub mod platform;
pub mod recent;
pub mod session;
pub mod traits;
