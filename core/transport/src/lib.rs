//! Elapsed-time sources for the update loop.

pub mod clock;
