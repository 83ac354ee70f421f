//! Bot API Client Library
//!
//! A thin async client for the Telegram Bot HTTP API.
//!
//! This crate provides:
//! - One call per remote method (`getMe`, `sendMessage`, `sendPhoto`, ...)
//! - Query-string `GET` or multipart `POST` encoding chosen per method
//! - Upload of in-memory buffers, byte streams and local files, or reuse of
//!   remote file ids
//! - A one-shot reply keyboard attached to the next outgoing message
//!
//! Responses are returned as parsed JSON without interpreting the envelope.

pub mod config;
pub mod telegram;
