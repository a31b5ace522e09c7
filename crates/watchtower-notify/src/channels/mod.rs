//! Concrete channel implementations.

pub mod discord;
pub mod whatsapp;

pub use discord::DiscordChannel;
pub use whatsapp::WhatsAppChannel;
