//! # Domain Layer

pub mod mailbox;
