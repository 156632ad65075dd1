//! Telegram Bot API transport
//!
//! Long-polls for updates and implements the runtime's `Messenger` port.

mod client;
pub mod types;

pub use client::TelegramClient;
