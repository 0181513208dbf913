use std::time::Duration;

use crate::config::Config;
use crate::error::FetchError;
use crate::media::{FileList, MediaCollection, MediaItem, MediaKind, RawDriveFile};

const DRIVE_FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";

// The Drive API has no client-side timeout by default; bound it so a stalled
// upstream cannot hang an invocation indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One folder listing request: which folder, and which kind of media to keep.
#[derive(Debug, Clone)]
pub struct FolderQuery {
    pub folder_id: String,
    pub kind: MediaKind,
}

impl FolderQuery {
    pub fn new(folder_id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            folder_id: folder_id.into(),
            kind,
        }
    }
}

pub struct MediaFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl MediaFetcher {
    pub fn new() -> Self {
        Self::with_endpoint(DRIVE_FILES_ENDPOINT)
    }

    /// Points the fetcher at a different files endpoint. Tests use this to
    /// talk to a local responder.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("http client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// One GET against the files endpoint. Returns the first page of results
    /// only; `nextPageToken` is not followed (see DESIGN.md).
    pub async fn list_files(
        &self,
        query: &FolderQuery,
        api_key: &str,
    ) -> Result<Vec<RawDriveFile>, FetchError> {
        if query.folder_id.trim().is_empty() {
            return Err(FetchError::Configuration("folder id"));
        }
        if api_key.trim().is_empty() {
            return Err(FetchError::Configuration("api key"));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", listing_query(query).as_str()),
                ("fields", field_selection(query.kind).as_str()),
                ("orderBy", "createdTime desc"),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Upstream { status, body });
        }

        let listing: FileList = serde_json::from_str(&body)?;
        Ok(listing.files)
    }

    /// Lists a folder, keeps only files that really carry the kind's MIME
    /// prefix, and normalizes the survivors.
    pub async fn fetch_media(
        &self,
        query: &FolderQuery,
        api_key: &str,
    ) -> Result<Vec<MediaItem>, FetchError> {
        let files = self.list_files(query, api_key).await?;
        let listed = files.len();
        let items = normalize_listing(files, query.kind);
        tracing::info!(
            "listed {} files :: kept {} {} items",
            listed,
            items.len(),
            query.kind
        );

        Ok(items)
    }

    /// Gallery and video folders fetched in parallel. If either side fails the
    /// whole call fails, so a published collection is never half-empty.
    pub async fn fetch_collection(&self, config: &Config) -> Result<MediaCollection, FetchError> {
        let gallery_query = FolderQuery::new(config.gallery_folder_id.clone(), MediaKind::Image);
        let video_query = FolderQuery::new(config.video_folder_id.clone(), MediaKind::Video);

        let (gallery, videos) = tokio::try_join!(
            self.fetch_media(&gallery_query, &config.api_key),
            self.fetch_media(&video_query, &config.api_key),
        )?;

        Ok(MediaCollection::new(gallery, videos))
    }
}

impl Default for MediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix filter plus normalization, separated from the I/O so it stays
/// testable. The provider-side `contains` match is broader than wanted, so the
/// prefix is re-checked here; files without a mimeType are dropped silently.
pub fn normalize_listing(files: Vec<RawDriveFile>, kind: MediaKind) -> Vec<MediaItem> {
    files
        .into_iter()
        .filter(|file| {
            file.mime_type
                .as_deref()
                .is_some_and(|mime| mime.starts_with(kind.mime_prefix()))
        })
        .map(|file| MediaItem::from_raw(file, kind))
        .collect()
}

fn listing_query(query: &FolderQuery) -> String {
    format!(
        "'{}' in parents and trashed = false and mimeType contains '{}'",
        query.folder_id,
        query.kind.mime_prefix()
    )
}

fn field_selection(kind: MediaKind) -> String {
    format!(
        "files(id,name,mimeType,description,createdTime,thumbnailLink,{})",
        kind.metadata_field()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Minimal canned-response HTTP server; picks the response by inspecting
    // the request head, so concurrent fetches can be answered differently.
    async fn spawn_responder<F>(pick: F) -> String
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&head).into_owned();
                let (status, body) = pick(&request);
                let reason = if status < 400 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}")
    }

    fn video_query() -> FolderQuery {
        FolderQuery::new("folder-vid", MediaKind::Video)
    }

    #[tokio::test]
    async fn blank_configuration_fails_before_any_request() {
        // Endpoint is unroutable: a Transport error here would mean the guard
        // let a request through.
        let fetcher = MediaFetcher::with_endpoint("http://127.0.0.1:1");

        let err = fetcher
            .fetch_media(&FolderQuery::new("", MediaKind::Image), "key")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Configuration("folder id")));

        let err = fetcher.fetch_media(&video_query(), "  ").await.unwrap_err();
        assert!(matches!(err, FetchError::Configuration("api key")));
    }

    #[test]
    fn listing_query_targets_folder_and_prefix() {
        let q = listing_query(&FolderQuery::new("folder123", MediaKind::Image));

        assert_eq!(
            q,
            "'folder123' in parents and trashed = false and mimeType contains 'image/'"
        );
    }

    #[test]
    fn field_selection_includes_kind_metadata() {
        assert!(field_selection(MediaKind::Image).contains("imageMediaMetadata"));
        assert!(field_selection(MediaKind::Video).contains("videoMediaMetadata"));
        assert!(field_selection(MediaKind::Video).contains("thumbnailLink"));
    }

    #[test]
    fn prefix_filter_keeps_matching_kind_only() {
        let files: Vec<RawDriveFile> = serde_json::from_value(serde_json::json!([
            {"id": "v1", "name": "Clip.mp4", "mimeType": "video/mp4"},
            {"id": "d1", "name": "Notes.pdf", "mimeType": "application/pdf"},
            {"id": "x1", "name": "mystery"},
        ]))
        .unwrap();

        let videos = normalize_listing(files.clone(), MediaKind::Video);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "v1");

        // The same video file under the image filter is dropped.
        assert!(normalize_listing(files, MediaKind::Image).is_empty());
    }

    #[test]
    fn image_listing_scenario_normalizes_two_of_three() {
        let files: Vec<RawDriveFile> = serde_json::from_value(serde_json::json!([
            {"id": "c1", "name": "Cat.png", "mimeType": "image/png"},
            {"id": "c2", "name": "Dog.jpg", "mimeType": "image/jpeg"},
            {"id": "p1", "name": "Flyer.pdf", "mimeType": "application/pdf"},
        ]))
        .unwrap();

        let items = normalize_listing(files, MediaKind::Image);

        assert_eq!(items.len(), 2);
        for item in &items {
            assert_eq!(item.kind, MediaKind::Image);
            assert_eq!(item.description, "");
            assert_eq!(
                item.url,
                format!("https://drive.google.com/uc?export=view&id={}", item.id)
            );
        }
    }

    #[tokio::test]
    async fn upstream_failure_preserves_status_and_body() {
        let endpoint = spawn_responder(|_| (503, r#"{"error": "backend unavailable"}"#.into())).await;
        let fetcher = MediaFetcher::with_endpoint(endpoint);

        let err = fetcher.fetch_media(&video_query(), "key").await.unwrap_err();

        match &err {
            FetchError::Upstream { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.contains("backend unavailable"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn non_json_success_body_is_malformed_response() {
        let endpoint = spawn_responder(|_| (200, "<html>proxy splash</html>".into())).await;
        let fetcher = MediaFetcher::with_endpoint(endpoint);

        let err = fetcher.fetch_media(&video_query(), "key").await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_object_body_lists_no_files() {
        let endpoint = spawn_responder(|_| (200, "{}".into())).await;
        let fetcher = MediaFetcher::with_endpoint(endpoint);

        let items = fetcher.fetch_media(&video_query(), "key").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let fetcher = MediaFetcher::with_endpoint("http://127.0.0.1:1");

        let err = fetcher.fetch_media(&video_query(), "key").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn dual_fetch_fails_whole_when_video_folder_degraded() {
        // Gallery succeeds, video folder answers 503; no partial collection
        // may come back.
        let endpoint = spawn_responder(|request| {
            if request.contains("video%2F") {
                (503, r#"{"error": "quota exceeded"}"#.into())
            } else {
                (
                    200,
                    r#"{"files": [{"id": "g1", "name": "Cat.png", "mimeType": "image/png"}]}"#
                        .into(),
                )
            }
        })
        .await;

        let fetcher = MediaFetcher::with_endpoint(endpoint);
        let config = Config {
            api_key: "key".into(),
            gallery_folder_id: "gallery".into(),
            video_folder_id: "videos".into(),
        };

        let err = fetcher.fetch_collection(&config).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn dual_fetch_builds_complete_collection() {
        let endpoint = spawn_responder(|request| {
            if request.contains("video%2F") {
                (
                    200,
                    r#"{"files": [{"id": "v1", "name": "Clip.mp4", "mimeType": "video/mp4"}]}"#
                        .into(),
                )
            } else {
                (
                    200,
                    r#"{"files": [
                        {"id": "g1", "name": "Cat.png", "mimeType": "image/png"},
                        {"id": "g2", "name": "Dog.jpg", "mimeType": "image/jpeg"}
                    ]}"#
                    .into(),
                )
            }
        })
        .await;

        let fetcher = MediaFetcher::with_endpoint(endpoint);
        let config = Config {
            api_key: "key".into(),
            gallery_folder_id: "gallery".into(),
            video_folder_id: "videos".into(),
        };

        let collection = fetcher.fetch_collection(&config).await.unwrap();

        assert_eq!(collection.counts.gallery, 2);
        assert_eq!(collection.counts.videos, 1);
        assert_eq!(collection.videos[0].kind, MediaKind::Video);
    }
}
