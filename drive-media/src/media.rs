use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Host used for the derived view and preview links.
pub const DRIVE_HOST: &str = "https://drive.google.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME prefix a listed file must actually carry to survive the listing.
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    /// Kind-specific metadata field requested from the Drive API.
    pub fn metadata_field(self) -> &'static str {
        match self {
            MediaKind::Image => "imageMediaMetadata",
            MediaKind::Video => "videoMediaMetadata",
        }
    }

    /// Derived link for one file id: direct view for images, preview embed for
    /// videos. Pure string templating, no network involved.
    pub fn view_url(self, id: &str) -> String {
        match self {
            MediaKind::Image => format!("{DRIVE_HOST}/uc?export=view&id={id}"),
            MediaKind::Video => format!("{DRIVE_HOST}/file/d/{id}/preview"),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// One file record as the Drive API reports it. External input: any field the
/// API may omit is optional, so a sparse record never fails to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub created_time: String,
    pub thumbnail_link: Option<String>,
    pub image_media_metadata: Option<serde_json::Value>,
    pub video_media_metadata: Option<serde_json::Value>,
}

/// Listing body. `files` is missing entirely for an empty folder, which is the
/// same as an empty list, not an error.
#[derive(Debug, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<RawDriveFile>,
}

/// Normalized media record, the shape the site consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub description: String,
    pub created_time: String,
    pub kind: MediaKind,
}

impl MediaItem {
    /// Pure mapping from a raw Drive record. Defaults for absent fields are
    /// applied here and nowhere else.
    pub fn from_raw(file: RawDriveFile, kind: MediaKind) -> Self {
        let url = kind.view_url(&file.id);
        Self {
            title: strip_extension(&file.name).to_owned(),
            url,
            thumbnail: file.thumbnail_link,
            description: file.description.unwrap_or_default(),
            created_time: file.created_time,
            id: file.id,
            kind,
        }
    }
}

/// Drops the trailing `.<ext>` from a file name. Only the last dot-delimited
/// suffix counts; a name without one is returned unchanged.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub gallery: usize,
    pub videos: usize,
}

/// The published collection. Built fresh on every invocation; a successful
/// fetch replaces the whole collection rather than updating one in place.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCollection {
    pub gallery: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub last_sync: String,
    pub counts: Counts,
}

impl MediaCollection {
    pub fn new(gallery: Vec<MediaItem>, videos: Vec<MediaItem>) -> Self {
        Self {
            counts: Counts {
                gallery: gallery.len(),
                videos: videos.len(),
            },
            last_sync: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            gallery,
            videos,
        }
    }
}
