//! Adapter implementations for the reference directory port.

pub mod memory;
