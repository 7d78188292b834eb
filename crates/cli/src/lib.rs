//! `wallmania` command-line client.
//!
//! Argument parsing ([`cli`]), environment configuration ([`config`]),
//! and the command handlers ([`commands`]) live here so they can be
//! tested without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;
