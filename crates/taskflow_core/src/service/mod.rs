//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate transitions and persistence behind session-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_session;
