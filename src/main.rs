//! botctl - Bot API command-line client
//!
//! Calls a single Telegram Bot API method and prints the JSON response.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use bot_api_client::config::BotConfig;
use bot_api_client::telegram::{
    check_envelope, BotApi, ChatAction, ChatId, InputFile, Params, ReplyKeyboard,
};

/// Command-line client for the Telegram Bot API.
#[derive(Parser, Debug)]
#[command(name = "botctl")]
#[command(about = "Call Telegram Bot API methods from the command line")]
#[command(version)]
struct Args {
    /// Bot token (overrides `TELEGRAM_BOT_TOKEN`).
    #[arg(long)]
    token: Option<String>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Exit with failure when the response envelope reports an error.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Command,
}

/// Keyboard flags shared by message-sending commands.
#[derive(clap::Args, Debug, Default)]
struct KeyboardArgs {
    /// Reply keyboard rows, e.g. "Yes,No;Cancel".
    #[arg(long)]
    keyboard: Option<String>,

    /// Remove the custom keyboard instead.
    #[arg(long, conflicts_with = "keyboard")]
    hide_keyboard: bool,

    /// Ask clients to fit the keyboard to its buttons.
    #[arg(long)]
    resize: bool,

    /// Hide the keyboard after one use.
    #[arg(long)]
    one_time: bool,

    /// Show the keyboard only to mentioned users.
    #[arg(long)]
    selective: bool,
}

impl KeyboardArgs {
    fn to_keyboard(&self) -> Option<ReplyKeyboard> {
        if self.hide_keyboard {
            return Some(ReplyKeyboard::from_flags(
                None,
                self.resize,
                self.one_time,
                self.selective,
            ));
        }

        self.keyboard.as_deref().map(|rows| {
            ReplyKeyboard::from_flags(
                Some(ReplyKeyboard::parse_rows(rows)),
                self.resize,
                self.one_time,
                self.selective,
            )
        })
    }
}

/// Media source: an existing local file is uploaded, anything else is sent
/// as a file id or URL.
#[derive(clap::Args, Debug)]
struct MediaArgs {
    /// Target chat id or @channel username.
    chat_id: String,

    /// Local file path, remote file id or URL.
    media: String,

    /// Media caption.
    #[arg(long)]
    caption: Option<String>,

    #[command(flatten)]
    keyboard: KeyboardArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show information about the bot.
    GetMe,

    /// Fetch pending updates.
    GetUpdates {
        #[arg(long)]
        offset: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
        /// Long-polling timeout in seconds.
        #[arg(long)]
        timeout: Option<u32>,
    },

    /// Register a webhook URL (empty string removes it).
    SetWebhook { url: String },

    /// Send a text message.
    SendMessage {
        chat_id: String,
        text: String,
        /// Parse mode (HTML, Markdown, MarkdownV2).
        #[arg(long)]
        parse_mode: Option<String>,
        #[command(flatten)]
        keyboard: KeyboardArgs,
    },

    /// Forward a message from one chat to another.
    ForwardMessage {
        chat_id: String,
        from_chat_id: String,
        message_id: i64,
    },

    /// Send a photo.
    SendPhoto(MediaArgs),

    /// Send an audio file.
    SendAudio(MediaArgs),

    /// Send a general file.
    SendDocument(MediaArgs),

    /// Send a sticker.
    SendSticker(MediaArgs),

    /// Send a video.
    SendVideo(MediaArgs),

    /// Send a voice note.
    SendVoice(MediaArgs),

    /// Send a map point.
    SendLocation {
        chat_id: String,
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        #[command(flatten)]
        keyboard: KeyboardArgs,
    },

    /// Show a chat action such as "typing".
    SendChatAction { chat_id: String, action: ChatAction },

    /// List a user's profile photos.
    GetUserProfilePhotos {
        user_id: i64,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let config = match args.token {
        Some(token) => {
            let mut config = BotConfig::new(token);
            if let Ok(api_url) = std::env::var("TELEGRAM_API_URL")
                && !api_url.trim().is_empty()
            {
                config = config.with_api_url(api_url.trim_end_matches('/'));
            }
            config
        }
        None => BotConfig::from_env().context("Failed to load bot configuration")?,
    };

    let api = BotApi::from_config(&config).context("Failed to create Bot API client")?;

    let response = execute(&api, args.command)
        .await
        .context("Bot API call failed")?;

    let pretty = serde_json::to_string_pretty(&response)?;
    println!("{pretty}");

    if args.check
        && let Err(e) = check_envelope(&response)
    {
        warn!("{}", e);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Dispatches one subcommand to the matching API method.
async fn execute(api: &BotApi, command: Command) -> Result<serde_json::Value> {
    let response = match command {
        Command::GetMe => api.get_me().await?,
        Command::GetUpdates {
            offset,
            limit,
            timeout,
        } => api.get_updates(offset, limit, timeout).await?,
        Command::SetWebhook { url } => api.set_webhook(&url).await?,
        Command::SendMessage {
            chat_id,
            text,
            parse_mode,
            keyboard,
        } => {
            stage_keyboard(api, &keyboard);
            let mut options = Params::new();
            options.insert_opt("parse_mode", parse_mode);
            api.send_message(ChatId::from(chat_id), &text, Some(options))
                .await?
        }
        Command::ForwardMessage {
            chat_id,
            from_chat_id,
            message_id,
        } => {
            api.forward_message(ChatId::from(chat_id), ChatId::from(from_chat_id), message_id)
                .await?
        }
        Command::SendPhoto(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_photo(chat_id, input, options).await?
        }
        Command::SendAudio(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_audio(chat_id, input, options).await?
        }
        Command::SendDocument(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_document(chat_id, input, options).await?
        }
        Command::SendSticker(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_sticker(chat_id, input, options).await?
        }
        Command::SendVideo(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_video(chat_id, input, options).await?
        }
        Command::SendVoice(media) => {
            let (chat_id, input, options) = media_call(api, media);
            api.send_voice(chat_id, input, options).await?
        }
        Command::SendLocation {
            chat_id,
            latitude,
            longitude,
            keyboard,
        } => {
            stage_keyboard(api, &keyboard);
            api.send_location(ChatId::from(chat_id), latitude, longitude, None)
                .await?
        }
        Command::SendChatAction { chat_id, action } => {
            api.send_chat_action(ChatId::from(chat_id), action).await?
        }
        Command::GetUserProfilePhotos {
            user_id,
            offset,
            limit,
        } => api.get_user_profile_photos(user_id, offset, limit).await?,
    };

    Ok(response)
}

fn stage_keyboard(api: &BotApi, args: &KeyboardArgs) {
    if let Some(keyboard) = args.to_keyboard() {
        api.set_reply_keyboard(&keyboard);
    }
}

fn media_call(api: &BotApi, media: MediaArgs) -> (ChatId, InputFile, Option<Params>) {
    stage_keyboard(api, &media.keyboard);

    let mut options = Params::new();
    options.insert_opt("caption", media.caption);

    (
        ChatId::from(media.chat_id),
        InputFile::from(media.media),
        Some(options),
    )
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
