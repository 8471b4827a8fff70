//! # Adapters Layer

pub mod bus;
