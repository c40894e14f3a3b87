//! Type conversions between Solidity contract types and the cleanup trait types

pub mod helpers;
pub mod submission;

pub use helpers::*;
pub use submission::*;
