use crate::domain::types::BroadcastId;

/// Result of sending a broadcast. Attachments that failed to upload are
/// listed; the broadcast itself is kept.
#[derive(Debug)]
pub struct SavedBroadcast {
    pub id: BroadcastId,
    pub uploaded: usize,
    pub upload_errors: Vec<String>,
}
