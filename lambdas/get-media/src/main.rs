use drive_media::{config::Config, drive::MediaFetcher, respond};
use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde_json::json;

fn empty_payload() -> serde_json::Value {
    json!({"gallery": [], "videos": []})
}

async fn handler(fetcher: &MediaFetcher, event: Request) -> Result<Response<Body>, Error> {
    if let Some(rejection) = respond::reject_non_get(&event)? {
        return Ok(rejection);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return respond::error(&err, empty_payload());
        }
    };

    match fetcher.fetch_collection(&config).await {
        Ok(collection) => {
            tracing::info!(
                "synced {} gallery items and {} videos",
                collection.counts.gallery,
                collection.counts.videos
            );
            respond::json(StatusCode::OK, Some(respond::CACHE_ONE_HOUR), &collection)
        }
        Err(err) => {
            tracing::error!("media sync failed :: {err}");
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
