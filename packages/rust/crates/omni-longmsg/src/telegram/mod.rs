//! Telegram Bot API transport.

mod error;
mod identity;
mod response;
mod transport;

pub use identity::parse_recipient_target;
pub use transport::TelegramTransport;
