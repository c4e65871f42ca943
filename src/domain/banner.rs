use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BannerFileId, BannerId, BannerTitle, ButtonText, LinkUrl};

/// Promo banner shown on the storefront.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub link: Option<String>,
    pub position: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub has_btn: bool,
    pub btn_text: Option<String>,
    #[serde(default)]
    pub files: Vec<BannerFile>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Image uploaded to a banner through `:upload-file`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BannerFile {
    pub id: BannerFileId,
    pub url: String,
    pub name: Option<String>,
}

/// Request body used both for creating and updating a banner.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBanner {
    pub title: BannerTitle,
    pub link: Option<LinkUrl>,
    pub position: i32,
    pub is_active: bool,
    pub has_btn: bool,
    pub btn_text: Option<ButtonText>,
}
