//! Channel layer for prompt matching over an interactive shell.
//!
//! This module handles reading device output until a prompt appears,
//! including ANSI stripping and tail-only pattern search.

mod buffer;
mod pty;

pub use buffer::PatternBuffer;
pub use pty::PtyChannel;
