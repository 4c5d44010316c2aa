//! Retry and polling policies.

pub mod poll;
pub mod retry;
