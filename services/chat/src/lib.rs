//! Realtime Chat Service
//!
//! A terminal client for the OpenAI Realtime API: it configures a text-only
//! session, streams the model's replies to the console, and answers tool
//! calls locally. The `chat` binary is a thin wrapper around [`session::run`].

pub mod config;
pub mod console;
pub mod session;
pub mod ws;
