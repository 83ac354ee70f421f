//! Remote method names and their transport mode.

use std::fmt;

/// How a request is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Parameters in the URL query string, `GET`.
    Query,
    /// Parameters as `multipart/form-data`, `POST`.
    Multipart,
}

/// A Bot API method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetUpdates,
    SetWebhook,
    GetMe,
    SendMessage,
    ForwardMessage,
    SendPhoto,
    SendAudio,
    SendDocument,
    SendSticker,
    SendVideo,
    SendVoice,
    SendLocation,
    SendChatAction,
    GetUserProfilePhotos,
}

impl Endpoint {
    /// Every known endpoint.
    pub const ALL: [Self; 14] = [
        Self::GetUpdates,
        Self::SetWebhook,
        Self::GetMe,
        Self::SendMessage,
        Self::ForwardMessage,
        Self::SendPhoto,
        Self::SendAudio,
        Self::SendDocument,
        Self::SendSticker,
        Self::SendVideo,
        Self::SendVoice,
        Self::SendLocation,
        Self::SendChatAction,
        Self::GetUserProfilePhotos,
    ];

    /// Method name as it appears in the URL path.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetUpdates => "getUpdates",
            Self::SetWebhook => "setWebhook",
            Self::GetMe => "getMe",
            Self::SendMessage => "sendMessage",
            Self::ForwardMessage => "forwardMessage",
            Self::SendPhoto => "sendPhoto",
            Self::SendAudio => "sendAudio",
            Self::SendDocument => "sendDocument",
            Self::SendSticker => "sendSticker",
            Self::SendVideo => "sendVideo",
            Self::SendVoice => "sendVoice",
            Self::SendLocation => "sendLocation",
            Self::SendChatAction => "sendChatAction",
            Self::GetUserProfilePhotos => "getUserProfilePhotos",
        }
    }

    /// Only `getUpdates` and `getMe` go out as query-string GETs.
    #[must_use]
    pub const fn transport(self) -> Transport {
        match self {
            Self::GetUpdates | Self::GetMe => Transport::Query,
            Self::SetWebhook
            | Self::SendMessage
            | Self::ForwardMessage
            | Self::SendPhoto
            | Self::SendAudio
            | Self::SendDocument
            | Self::SendSticker
            | Self::SendVideo
            | Self::SendVoice
            | Self::SendLocation
            | Self::SendChatAction
            | Self::GetUserProfilePhotos => Transport::Multipart,
        }
    }

    /// Whether the call produces a chat message and so consumes the
    /// pending reply keyboard.
    #[must_use]
    pub const fn sends_message(self) -> bool {
        matches!(
            self,
            Self::SendMessage
                | Self::SendPhoto
                | Self::SendAudio
                | Self::SendDocument
                | Self::SendSticker
                | Self::SendVideo
                | Self::SendVoice
                | Self::SendLocation
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_get_updates_and_get_me_use_query() {
        for endpoint in Endpoint::ALL {
            let expected = match endpoint.name() {
                "getUpdates" | "getMe" => Transport::Query,
                _ => Transport::Multipart,
            };
            assert_eq!(endpoint.transport(), expected, "{endpoint}");
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Endpoint::ALL.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Endpoint::ALL.len());
    }

    #[test]
    fn test_message_endpoints() {
        assert!(Endpoint::SendMessage.sends_message());
        assert!(Endpoint::SendVoice.sends_message());
        assert!(Endpoint::SendLocation.sends_message());
        assert!(!Endpoint::SendChatAction.sends_message());
        assert!(!Endpoint::ForwardMessage.sends_message());
        assert!(!Endpoint::GetMe.sends_message());
    }
}
