//! Reply keyboard markup.

use serde_json::json;

/// Custom reply keyboard, or an instruction to remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKeyboard {
    Hide {
        hide_keyboard: bool,
        selective: bool,
    },
    Layout {
        keyboard: Vec<Vec<String>>,
        resize_keyboard: bool,
        one_time_keyboard: bool,
        selective: bool,
    },
}

impl ReplyKeyboard {
    #[must_use]
    pub const fn hide(selective: bool) -> Self {
        Self::Hide {
            hide_keyboard: true,
            selective,
        }
    }

    #[must_use]
    pub fn layout(
        keyboard: Vec<Vec<String>>,
        resize_keyboard: bool,
        one_time_keyboard: bool,
        selective: bool,
    ) -> Self {
        Self::Layout {
            keyboard,
            resize_keyboard,
            one_time_keyboard,
            selective,
        }
    }

    /// Builds markup from positional flags.
    ///
    /// Without a layout the result hides the keyboard, and `resize` doubles
    /// as the selective flag when `selective` is not set.
    #[must_use]
    pub fn from_flags(
        layout: Option<Vec<Vec<String>>>,
        resize: bool,
        one_time: bool,
        selective: bool,
    ) -> Self {
        match layout {
            Some(rows) => Self::layout(rows, resize, one_time, selective),
            None => Self::hide(selective || resize),
        }
    }

    /// Parses `"a,b;c"` into rows `[["a", "b"], ["c"]]`.
    #[must_use]
    pub fn parse_rows(spec: &str) -> Vec<Vec<String>> {
        spec.split(';')
            .map(|row| {
                row.split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect()
    }

    /// JSON text sent as the `reply_markup` field.
    #[must_use]
    pub fn to_json(&self) -> String {
        let markup = match self {
            Self::Hide {
                hide_keyboard,
                selective,
            } => json!({
                "hide_keyboard": hide_keyboard,
                "selective": selective,
            }),
            Self::Layout {
                keyboard,
                resize_keyboard,
                one_time_keyboard,
                selective,
            } => json!({
                "keyboard": keyboard,
                "resize_keyboard": resize_keyboard,
                "one_time_keyboard": one_time_keyboard,
                "selective": selective,
            }),
        };
        markup.to_string()
    }
}
