//! Telegram Bot API client module.
//!
//! Provides the [`BotApi`] façade, the request dispatcher that picks
//! between query-string `GET` and multipart `POST`, and the media and
//! keyboard types that feed into outgoing requests.

mod client;
mod dispatch;
mod endpoint;
mod error;
mod keyboard;
mod media;
mod params;

pub use client::BotApi;
pub use dispatch::Dispatcher;
pub use endpoint::{Endpoint, Transport};
pub use error::{check_envelope, TelegramError};
pub use keyboard::ReplyKeyboard;
pub use media::{
    content_type_for, FileBody, FilePart, InputFile, MediaReader, ResolvedField, OCTET_STREAM,
};
pub use params::{ChatAction, ChatId, ParamValue, Params};
