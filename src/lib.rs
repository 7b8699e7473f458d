//! Chat Relay - a single-session conversational relay in front of a
//! generative language model.
//!
//! A client posts a prompt; the relay forwards it, together with the
//! conversation so far, to the model and answers with the reply and the
//! full history. One process hosts exactly one conversation.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
