use serde::Serialize;

use crate::domain::banner::BannerFile;
use crate::domain::types::BannerId;
use crate::dto::FormData;

/// Data for the banner create/edit page.
#[derive(Debug, Serialize)]
pub struct BannerFormPageData {
    pub id: Option<BannerId>,
    pub form: FormData,
    pub files: Vec<BannerFile>,
}

/// Result of saving a banner: the banner is stored even when some of its
/// images failed to upload.
#[derive(Debug)]
pub struct SavedBanner {
    pub id: BannerId,
    pub uploaded: usize,
    pub upload_errors: Vec<String>,
}
