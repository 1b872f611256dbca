//! # Encoder
//!
//! Builds and runs external encoder processes: assembling a cut from a
//! compiled filter graph, muxing a soundtrack, and probing durations.

pub mod command;
pub mod invoker;

pub use command::EncoderInvocation;
pub use invoker::{EncodedOutput, Encoder};
