//! Z360 docs assistant
//!
//! A documentation site backend: a chat endpoint that answers questions
//! grounded in the docs corpus, raw-text page exports, and a terminal chat
//! client built on a pure session state machine.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod api;
pub mod config;
pub mod context;
pub mod conversation;
pub mod corpus;
pub mod export;
pub mod export_cache;
pub mod llm;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;
