pub mod client;
pub mod error;
pub mod keyboard;
pub mod transport;

pub use client::TelegramTransport;
pub use error::{DeliveryError, TelegramError};
pub use keyboard::ReplyKeyboard;
pub use transport::Transport;
