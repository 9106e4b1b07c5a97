use chrono::{DateTime, Utc};
use mime::Mime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_NAME: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Anything that is not `image/*` is filed as video.
    pub fn from_content_type(content_type: &Mime) -> Self {
        if content_type.type_() == mime::IMAGE {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

/// Record identity: a timestamp for the in-memory list, whatever the table's
/// primary key is for Supabase (identity column or uuid).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(alias = "url")]
    pub src: String,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A record before the store has given it an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryRecord {
    pub kind: MediaKind,
    pub src: String,
    pub name: String,
    pub message: String,
}

impl NewGalleryRecord {
    pub fn new(kind: MediaKind, src: String, name: Option<String>, message: Option<String>) -> Self {
        Self {
            kind,
            src,
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            message: message.unwrap_or_default(),
        }
    }

    pub fn with_id(self, id: impl Into<RecordId>, created_at: Option<DateTime<Utc>>) -> GalleryRecord {
        GalleryRecord {
            id: id.into(),
            kind: self.kind,
            src: self.src,
            name: self.name,
            message: self.message,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types_are_images() {
        for ct in ["image/jpeg", "image/png", "image/svg+xml"] {
            let mime: Mime = ct.parse().unwrap();
            assert_eq!(MediaKind::from_content_type(&mime), MediaKind::Image, "{ct}");
        }
    }

    #[test]
    fn everything_else_is_video() {
        for ct in ["video/mp4", "application/octet-stream", "text/plain"] {
            let mime: Mime = ct.parse().unwrap();
            assert_eq!(MediaKind::from_content_type(&mime), MediaKind::Video, "{ct}");
        }
    }

    #[test]
    fn defaults_apply_to_missing_or_empty_name() {
        let rec = NewGalleryRecord::new(MediaKind::Image, "/uploads/a".into(), None, None);
        assert_eq!(rec.name, "Anonymous");
        assert_eq!(rec.message, "");

        let rec = NewGalleryRecord::new(MediaKind::Image, "/uploads/a".into(), Some(String::new()), None);
        assert_eq!(rec.name, "Anonymous");
    }

    #[test]
    fn serializes_type_field_and_skips_missing_created_at() {
        let rec = NewGalleryRecord::new(
            MediaKind::Video,
            "/uploads/1-clip.mp4".into(),
            Some("Bob".into()),
            Some("hey".into()),
        )
        .with_id(7, None);

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "type": "video",
                "src": "/uploads/1-clip.mp4",
                "name": "Bob",
                "message": "hey",
            })
        );
    }

    #[test]
    fn accepts_url_column_on_read() {
        let rec: GalleryRecord = serde_json::from_value(serde_json::json!({
            "id": 3,
            "type": "image",
            "url": "https://x.supabase.co/storage/v1/object/public/gallery/1-a.png",
            "name": "Ann",
            "message": "",
            "created_at": "2024-05-01T10:00:00+00:00",
        }))
        .unwrap();
        assert_eq!(rec.kind, MediaKind::Image);
        assert!(rec.src.ends_with("1-a.png"));
        assert!(rec.created_at.is_some());
    }

    #[test]
    fn uuid_primary_keys_are_accepted() {
        let rec: GalleryRecord = serde_json::from_value(serde_json::json!({
            "id": "5b7f3c1e-8f4a-4a43-9d3e-2f0f1c6b9a10",
            "type": "video",
            "url": "https://x.supabase.co/storage/v1/object/public/gallery/1-a.mp4",
            "name": "Ann",
            "message": "",
            "created_at": "2024-05-01T10:00:00+00:00",
        }))
        .unwrap();
        assert_eq!(
            rec.id,
            RecordId::Text("5b7f3c1e-8f4a-4a43-9d3e-2f0f1c6b9a10".to_string())
        );
        assert_eq!(rec.id.to_string(), "5b7f3c1e-8f4a-4a43-9d3e-2f0f1c6b9a10");

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["id"], "5b7f3c1e-8f4a-4a43-9d3e-2f0f1c6b9a10");
    }

    #[test]
    fn integer_ids_stay_numbers() {
        let value = serde_json::to_value(RecordId::from(42)).unwrap();
        assert_eq!(value, serde_json::json!(42));
    }
}
