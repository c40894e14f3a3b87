//! Types shared by all cleanup contract backends

pub mod network;
pub mod submission;

pub use network::*;
pub use submission::*;
