//! Bot API façade: one method per remote endpoint.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::dispatch::Dispatcher;
use super::endpoint::Endpoint;
use super::keyboard::ReplyKeyboard;
use super::media::{InputFile, ResolvedField};
use super::params::{ChatAction, ChatId, ParamValue, Params};
use super::TelegramError;
use crate::config::{BotConfig, DEFAULT_API_URL};

/// Field carrying keyboard markup.
const REPLY_MARKUP: &str = "reply_markup";

/// Client for a single bot.
///
/// Every call returns the parsed JSON body as-is, including failure
/// envelopes (`"ok": false`). Use [`super::check_envelope`] to turn those
/// into errors.
pub struct BotApi {
    dispatcher: Dispatcher,

    /// Markup for the next message-sending call.
    ///
    /// Last write wins. The slot is emptied by the next call that sends a
    /// message, whether or not that call succeeds. Callers issuing
    /// concurrent sends should pass `reply_markup` in the call options
    /// instead of going through [`BotApi::set_keyboard`].
    pending_keyboard: Mutex<Option<String>>,
}

impl BotApi {
    /// Creates a client for the public Bot API.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::InvalidConfiguration`] if the token is empty.
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        Self::with_client(Client::builder().build()?, DEFAULT_API_URL, token)
    }

    /// Creates a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`BotApi::with_client`].
    pub fn from_config(config: &BotConfig) -> Result<Self, TelegramError> {
        Self::with_client(Client::builder().build()?, &config.api_url, &config.token)
    }

    /// Creates a client on a shared HTTP client and custom API host.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::InvalidConfiguration`] if the token is empty
    /// or `api_url` is not an absolute URL.
    pub fn with_client(http: Client, api_url: &str, token: &str) -> Result<Self, TelegramError> {
        if token.trim().is_empty() {
            return Err(TelegramError::InvalidConfiguration(
                "Telegram Bot token not provided".to_owned(),
            ));
        }

        if let Err(e) = Url::parse(api_url) {
            return Err(TelegramError::InvalidConfiguration(format!(
                "Invalid Bot API URL {api_url:?}: {e}"
            )));
        }

        let dispatcher = Dispatcher::new(http, api_url, token);
        debug!("Created Bot API client: {:?}", dispatcher);

        Ok(Self {
            dispatcher,
            pending_keyboard: Mutex::new(None),
        })
    }

    /// Stores keyboard markup for the next message-sending call.
    ///
    /// A missing `layout` hides the keyboard instead; see
    /// [`ReplyKeyboard::from_flags`].
    pub fn set_keyboard(
        &self,
        layout: Option<Vec<Vec<String>>>,
        resize: bool,
        one_time: bool,
        selective: bool,
    ) -> &Self {
        self.set_reply_keyboard(&ReplyKeyboard::from_flags(layout, resize, one_time, selective))
    }

    /// Stores already-built markup for the next message-sending call.
    pub fn set_reply_keyboard(&self, keyboard: &ReplyKeyboard) -> &Self {
        let previous = self.keyboard_slot().replace(keyboard.to_json());
        if previous.is_some() {
            debug!("Replacing pending keyboard that was never sent");
        }
        self
    }

    /// Whether a keyboard is waiting for the next message.
    pub fn has_pending_keyboard(&self) -> bool {
        self.keyboard_slot().is_some()
    }

    /// Fetches incoming updates by long polling.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        limit: Option<u32>,
        timeout: Option<u32>,
    ) -> Result<Value, TelegramError> {
        let mut params = Params::new();
        params.insert_opt("offset", offset);
        params.insert_opt("limit", limit);
        params.insert_opt("timeout", timeout);
        self.call(Endpoint::GetUpdates, params).await
    }

    /// Registers a webhook URL. An empty URL removes the webhook.
    pub async fn set_webhook(&self, url: &str) -> Result<Value, TelegramError> {
        self.call(Endpoint::SetWebhook, Params::new().with("url", url))
            .await
    }

    /// Returns basic information about the bot.
    pub async fn get_me(&self) -> Result<Value, TelegramError> {
        self.call(Endpoint::GetMe, Params::new()).await
    }

    /// Sends a text message, with the pending keyboard if one is set.
    ///
    /// `options` carries optional fields such as `parse_mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn send_message(
        &self,
        chat_id: impl Into<ChatId>,
        text: &str,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        let chat_id: ChatId = chat_id.into();
        let params = options
            .unwrap_or_default()
            .with("chat_id", chat_id)
            .with("text", text);
        self.call(Endpoint::SendMessage, params).await
    }

    /// Forwards message `message_id` from `from_chat_id` to `chat_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn forward_message(
        &self,
        chat_id: impl Into<ChatId>,
        from_chat_id: impl Into<ChatId>,
        message_id: i64,
    ) -> Result<Value, TelegramError> {
        let chat_id: ChatId = chat_id.into();
        let from_chat_id: ChatId = from_chat_id.into();
        let params = Params::new()
            .with("chat_id", chat_id)
            .with("from_chat_id", from_chat_id)
            .with("message_id", message_id);
        self.call(Endpoint::ForwardMessage, params).await
    }

    /// Sends a photo.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::UnsupportedMediaInput`] if the photo cannot
    /// be resolved, or an error if the request fails.
    pub async fn send_photo(
        &self,
        chat_id: impl Into<ChatId>,
        photo: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(Endpoint::SendPhoto, "photo", chat_id.into(), photo.into(), options)
            .await
    }

    /// Sends an audio file. See [`BotApi::send_photo`].
    pub async fn send_audio(
        &self,
        chat_id: impl Into<ChatId>,
        audio: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(Endpoint::SendAudio, "audio", chat_id.into(), audio.into(), options)
            .await
    }

    /// Sends a general file. See [`BotApi::send_photo`].
    pub async fn send_document(
        &self,
        chat_id: impl Into<ChatId>,
        document: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(
            Endpoint::SendDocument,
            "document",
            chat_id.into(),
            document.into(),
            options,
        )
        .await
    }

    /// Sends a sticker. See [`BotApi::send_photo`].
    pub async fn send_sticker(
        &self,
        chat_id: impl Into<ChatId>,
        sticker: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(
            Endpoint::SendSticker,
            "sticker",
            chat_id.into(),
            sticker.into(),
            options,
        )
        .await
    }

    /// Sends a video. See [`BotApi::send_photo`].
    pub async fn send_video(
        &self,
        chat_id: impl Into<ChatId>,
        video: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(Endpoint::SendVideo, "video", chat_id.into(), video.into(), options)
            .await
    }

    /// Sends a voice note, uploaded under the `voice` field.
    pub async fn send_voice(
        &self,
        chat_id: impl Into<ChatId>,
        voice: impl Into<InputFile>,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        self.send_media(Endpoint::SendVoice, "voice", chat_id.into(), voice.into(), options)
            .await
    }

    /// Sends a map point.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn send_location(
        &self,
        chat_id: impl Into<ChatId>,
        latitude: f64,
        longitude: f64,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        let chat_id: ChatId = chat_id.into();
        let params = options
            .unwrap_or_default()
            .with("chat_id", chat_id)
            .with("latitude", latitude)
            .with("longitude", longitude);
        self.call(Endpoint::SendLocation, params).await
    }

    /// Shows a chat action such as "typing". Leaves the pending keyboard
    /// in place.
    pub async fn send_chat_action(
        &self,
        chat_id: impl Into<ChatId>,
        action: ChatAction,
    ) -> Result<Value, TelegramError> {
        let chat_id: ChatId = chat_id.into();
        let params = Params::new()
            .with("chat_id", chat_id)
            .with("action", action);
        self.call(Endpoint::SendChatAction, params).await
    }

    /// Lists a user's profile photos.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn get_user_profile_photos(
        &self,
        user_id: i64,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, TelegramError> {
        let mut params = Params::new().with("user_id", user_id);
        params.insert_opt("offset", offset);
        params.insert_opt("limit", limit);
        self.call(Endpoint::GetUserProfilePhotos, params).await
    }

    /// Calls `endpoint` with raw parameters.
    ///
    /// Message-sending endpoints pick up the pending keyboard here, before
    /// any media is resolved.
    pub async fn call(&self, endpoint: Endpoint, mut params: Params) -> Result<Value, TelegramError> {
        if endpoint.sends_message() {
            let pending = self.keyboard_slot().take();
            attach_keyboard(&mut params, pending);
        }

        let fields = resolve_params(params).await?;
        let response = self.dispatcher.dispatch(endpoint, fields).await?;
        info!("{} completed", endpoint);
        Ok(response)
    }

    async fn send_media(
        &self,
        endpoint: Endpoint,
        field: &str,
        chat_id: ChatId,
        media: InputFile,
        options: Option<Params>,
    ) -> Result<Value, TelegramError> {
        let params = options
            .unwrap_or_default()
            .with("chat_id", chat_id)
            .with(field, media);
        self.call(endpoint, params).await
    }

    fn keyboard_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.pending_keyboard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi")
            .field("dispatcher", &self.dispatcher)
            .field("has_pending_keyboard", &self.has_pending_keyboard())
            .finish()
    }
}

/// Adds pending markup unless the caller already supplied `reply_markup`.
fn attach_keyboard(params: &mut Params, pending: Option<String>) {
    let Some(markup) = pending else {
        return;
    };

    if params.contains_key(REPLY_MARKUP) {
        debug!("Explicit reply_markup given, dropping pending keyboard");
    } else {
        params.insert(REPLY_MARKUP, markup);
    }
}

async fn resolve_params(params: Params) -> Result<Vec<(String, ResolvedField)>, TelegramError> {
    let mut fields = Vec::with_capacity(params.len());
    for (name, value) in params {
        let field = match value {
            ParamValue::Text(text) => ResolvedField::Text(text),
            ParamValue::File(input) => input.resolve().await?,
        };
        fields.push((name, field));
    }
    Ok(fields)
}
