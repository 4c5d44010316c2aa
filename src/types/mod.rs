//! Wire types for the Direct Line protocol.

pub mod activity;
pub mod conversation;

pub use activity::*;
pub use conversation::*;
