//! daynote-sync - Two-way sync between a remote task list and a daily note
//!
//! This library reconciles the tasks of a hosted task list (Microsoft To Do) with
//! the checkbox lines of a plain-text daily note. Tasks missing on either side are
//! created on the other, and completions travel both ways.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`backend`] - Remote task store trait and implementations
//! * [`note`] - Daily note store trait, line parser and filesystem store
//! * [`sync`] - Matching and the three-phase sync engine
//! * [`config`] - Application configuration management
//! * [`logger`] - Logging setup
//! * [`utils`] - Utility functions and helpers

/// Remote task store abstraction and implementations
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Logging setup for the library and binary
pub mod logger;

/// Local daily note store
pub mod note;

/// Synchronization engine for keeping the note and the remote list in sync
pub mod sync;

/// Utility functions for date/time handling
pub mod utils;
