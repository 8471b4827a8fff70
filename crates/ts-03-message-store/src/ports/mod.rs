//! # Ports Layer

pub mod outbound;
