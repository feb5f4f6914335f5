use std::io;

use async_trait::async_trait;
use futures_lite::{AsyncReadExt, Future};
use proto::prelude::Transport;
use serde::Deserialize;
use tide::http::mime;
use tide::{Middleware, Next, Request, Response};

use super::state::AppState;
use crate::skill::envelope::RequestEnvelope;

const MAX_PAYLOAD: usize = 64 * 1024;

pub async fn invoke<T: Transport + 'static>(mut req: Request<AppState<T>>) -> tide::Result<Response> {
    JsonResponder::parse(async move {
        if req.len().map_or(false, |len| len > MAX_PAYLOAD) {
            return Err(Error::EntityTooLarge);
        }
        // chunked bodies carry no length, so never buffer past the limit
        let mut payload = Vec::new();
        req.take_body()
            .take(MAX_PAYLOAD as u64 + 1)
            .read_to_end(&mut payload)
            .await
            .map_err(Error::Read)?;
        let envelope: RequestEnvelope = check_payload(payload)?;
        let response = req.state().skill.handle(&envelope).await;
        serde_json::to_vec(&response).map_err(Error::Serialize)
    })
    .await
}

pub async fn health<State>(_req: Request<State>) -> tide::Result<Response> {
    Ok(Response::builder(200).body("ok").build())
}

/// Logs every request with the status it was answered with.
pub struct LogMiddleware;

#[async_trait]
impl<State: Clone + Send + Sync + 'static> Middleware<State> for LogMiddleware {
    async fn handle(&self, req: Request<State>, next: Next<'_, State>) -> tide::Result {
        let method = req.method();
        let path = req.url().path().to_owned();
        let response = next.run(req).await;
        log::debug!("{} {} -> {}", method, path, response.status());
        Ok(response)
    }
}

fn check_payload<T>(payload: Vec<u8>) -> Result<T, Error>
where
    T: for<'a> Deserialize<'a>,
{
    if payload.len() > MAX_PAYLOAD {
        Err(Error::EntityTooLarge)
    } else {
        serde_json::from_slice(&payload).map_err(Error::Deserialize)
    }
}

enum JsonResponder {
    Ok(Vec<u8>),
    Err(Error),
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Deserialize Error")]
    Deserialize(serde_json::Error),
    #[error("Serialize Error")]
    Serialize(serde_json::Error),
    #[error("Read Error")]
    Read(io::Error),
    #[error("Entity Too Large")]
    EntityTooLarge,
}

impl JsonResponder {
    async fn parse(f: impl Future<Output = Result<Vec<u8>, Error>>) -> tide::Result<Response> {
        let self_: JsonResponder = f.await.into();
        Ok(self_.respond())
    }
    fn respond(self) -> Response {
        match self {
            JsonResponder::Ok(x) => Response::builder(200)
                .body(x)
                .content_type(mime::JSON)
                .build(),
            JsonResponder::Err(err) => match err {
                Error::Deserialize(err) => {
                    log::warn!("Error deserializing request envelope: {}", err);
                    Response::builder(400)
                        .body("See log for more information")
                        .build()
                }
                Error::EntityTooLarge => {
                    log::warn!("Client send a very large payload");
                    Response::builder(413)
                        .body("See log for more information")
                        .build()
                }
                Error::Serialize(err) => {
                    log::error!("unexpected serialize error: {:?}", err);
                    Response::builder(500)
                        .body("See log for more information")
                        .build()
                }
                Error::Read(err) => {
                    log::warn!("Error reading request body: {}", err);
                    Response::builder(400)
                        .body("See log for more information")
                        .build()
                }
            },
        }
    }
}

impl From<Result<Vec<u8>, Error>> for JsonResponder {
    fn from(result: Result<Vec<u8>, Error>) -> Self {
        match result {
            Ok(x) => JsonResponder::Ok(x),
            Err(x) => JsonResponder::Err(x),
        }
    }
}
