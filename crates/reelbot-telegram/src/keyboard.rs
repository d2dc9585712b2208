use serde::Serialize;

/// Bot API `ReplyKeyboardMarkup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyKeyboard {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

impl ReplyKeyboard {
    /// A resized keyboard holding exactly one button.
    pub fn single(label: impl Into<String>) -> Self {
        Self {
            keyboard: vec![vec![KeyboardButton { text: label.into() }]],
            resize_keyboard: true,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keyboard.iter().flatten().map(|b| b.text.as_str())
    }
}
