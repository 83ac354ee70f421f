//! Request parameter types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::media::InputFile;

/// A single request field value.
#[derive(Debug)]
pub enum ParamValue {
    /// Scalar sent as text (numbers and booleans are stringified).
    Text(String),
    /// Media resolved right before transmission.
    File(InputFile),
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<InputFile> for ParamValue {
    fn from(value: InputFile) -> Self {
        Self::File(value)
    }
}

impl From<ChatId> for ParamValue {
    fn from(value: ChatId) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! text_param_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

text_param_from!(i32, i64, u32, u64, f64, bool);

/// Field name to value mapping for one request.
///
/// Setting a key twice keeps the last value. Fields left unset are simply
/// not transmitted.
#[derive(Debug, Default)]
pub struct Params {
    fields: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Sets a field only when a value is present.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Whether `key` has been set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Value set for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.fields.get(key)
    }

    /// Number of fields that will be transmitted.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Target chat: numeric id or `@username` of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        value.parse().map_or_else(|_| Self::Username(value.to_owned()), Self::Id)
    }
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Activity shown to the user by `sendChatAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordAudio,
    UploadAudio,
    UploadDocument,
    FindLocation,
}

impl ChatAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordAudio => "record_audio",
            Self::UploadAudio => "upload_audio",
            Self::UploadDocument => "upload_document",
            Self::FindLocation => "find_location",
        }
    }
}

impl fmt::Display for ChatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "typing" => Ok(Self::Typing),
            "upload_photo" => Ok(Self::UploadPhoto),
            "record_video" => Ok(Self::RecordVideo),
            "upload_video" => Ok(Self::UploadVideo),
            "record_audio" => Ok(Self::RecordAudio),
            "upload_audio" => Ok(Self::UploadAudio),
            "upload_document" => Ok(Self::UploadDocument),
            "find_location" => Ok(Self::FindLocation),
            other => Err(format!("unknown chat action: {other}")),
        }
    }
}

impl From<ChatAction> for ParamValue {
    fn from(value: ChatAction) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}
