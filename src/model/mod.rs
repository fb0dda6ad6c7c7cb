//! Wire-facing data model for the console's decision core.

pub mod access;
pub mod election;
