use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BroadcastId, BroadcastText, BroadcastTitle};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    pub url: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    pub id: BroadcastId,
    pub title: String,
    pub text: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBroadcast {
    pub title: BroadcastTitle,
    pub text: BroadcastText,
}
