//! # watchtower-notify
//!
//! Outbound notification channels and the alert dispatcher.
//!
//! A [`channel::NotificationChannel`] knows how to deliver one alert to
//! one address; the [`dispatcher::AlertDispatcher`] owns the configured
//! channels, fans an alert out to a pod's destinations, and paces sends
//! to stay under the downstream rate limits.

pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod format;

pub use channel::NotificationChannel;
pub use dispatcher::AlertDispatcher;
