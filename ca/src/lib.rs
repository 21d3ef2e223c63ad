//! codeagent - a terminal chat client for Claude with local file tools
//!
//! The user types a message; the whole conversation goes to the model; any
//! tools the model asks for run locally and their results go straight back,
//! without waiting for the user, until the model answers in plain text.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`tools`] - read_file, list_files and edit_file plus their registry
//! - [`repl`] - conversation state and the dispatch loop
//! - [`config`] - configuration and API key loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod repl;
pub mod tools;
