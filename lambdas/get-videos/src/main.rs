use drive_media::{
    config::{self, API_KEY_VAR, VIDEO_FOLDER_VAR},
    drive::{FolderQuery, MediaFetcher},
    media::MediaKind,
    respond,
};
use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde_json::json;

fn empty_payload() -> serde_json::Value {
    json!({"files": []})
}

async fn handler(fetcher: &MediaFetcher, event: Request) -> Result<Response<Body>, Error> {
    if let Some(rejection) = respond::reject_non_get(&event)? {
        return Ok(rejection);
    }

    let api_key = config::require_env(API_KEY_VAR);
    let folder_id = config::require_env(VIDEO_FOLDER_VAR);
    tracing::info!(
        has_api_key = api_key.is_ok(),
        has_folder_id = folder_id.is_ok(),
        "checked environment"
    );

    let (api_key, folder_id) = match (api_key, folder_id) {
        (Ok(api_key), Ok(folder_id)) => (api_key, folder_id),
        (Err(err), _) | (_, Err(err)) => {
            tracing::error!("{err}");
            return respond::error(&err, empty_payload());
        }
    };

    let query = FolderQuery::new(folder_id, MediaKind::Video);
    match fetcher.fetch_media(&query, &api_key).await {
        Ok(files) => {
            let count = files.len();
            tracing::info!("fetched {count} videos");
            respond::json(
                StatusCode::OK,
                Some(respond::CACHE_SHORT),
                &json!({"files": files, "count": count}),
            )
        }
        Err(err) => {
            tracing::error!("video listing failed :: {err}");
            respond::error(&err, empty_payload())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let fetcher = MediaFetcher::new();
    run(service_fn(|event| handler(&fetcher, event))).await
}
