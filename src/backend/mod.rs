//! Shipped implementations of the host collaborators.
//!
//! - `headless`: in-memory windows, dialogs and desktop host
//! - `bridge`: drives the headless backend over JSON lines on stdin/stdout

pub mod bridge;
pub mod headless;

pub use headless::{HeadlessBackend, HeadlessWindow, HostNotice, WindowKind, WindowRecord};
