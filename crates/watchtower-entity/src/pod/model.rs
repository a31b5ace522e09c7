//! Pod and channel destination models.
//!
//! A pod is a team/unit responsible for a set of client brands. Channel
//! destinations map a pod to the Discord channels and WhatsApp numbers
//! that should receive its alerts. Both are static configuration rows,
//! read-only from the evaluation/dispatch path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// A team/unit within the agency.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pod {
    /// Unique pod identifier.
    pub id: Uuid,
    /// Pod display name.
    pub name: String,
    /// Inactive pods receive no notifications.
    pub is_active: bool,
    /// When the pod was created.
    pub created_at: DateTime<Utc>,
}

/// Which third-party channel a destination uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "channel_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Discord bot HTTP relay.
    Discord,
    /// Twilio WhatsApp.
    Whatsapp,
}

impl ChannelKind {
    /// Return the channel kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a pod's alerts go: a Discord channel id or a WhatsApp number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChannelDestination {
    /// Unique destination identifier.
    pub id: Uuid,
    /// The pod this destination belongs to.
    pub pod_id: Uuid,
    /// Which channel to send through.
    pub channel: ChannelKind,
    /// Channel address: Discord channel id or `whatsapp:+...` number.
    pub address: String,
    /// Inactive destinations are skipped by the dispatcher.
    pub is_active: bool,
}
