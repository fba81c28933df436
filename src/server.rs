use crate::common::*;
use crate::config::FeedMeta;
use crate::feed::*;
use crate::story::decode_stories;
use chrono::prelude::*;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

/// Fetch, decode and render, holding nothing between requests.
pub struct Pipeline<S> {
    source: S,
    meta: FeedMeta,
}

impl<S: FeedSource> Pipeline<S> {
    pub fn new(source: S, meta: FeedMeta) -> Pipeline<S> {
        Pipeline { source, meta }
    }

    pub async fn feed(&self, created: DateTime<Utc>) -> RssResult<Vec<u8>> {
        let start = Instant::now();

        let body = self.source.fetch().await?;
        let stories = decode_stories(&body)?;
        let channel = stories_to_channel(stories, &self.meta, created);
        let rendered = render_channel(&channel)?;

        debug!(
            "story request and feed assembling took {:?} ({} items)",
            start.elapsed(),
            channel.items().len()
        );
        Ok(rendered)
    }
}

fn respond(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
}

pub async fn serve_rss<S: FeedSource, B>(
    pipeline: Arc<Pipeline<S>>,
    req: Request<B>,
) -> Response<Full<Bytes>> {
    if req.uri().path() != "/" {
        return respond(StatusCode::NOT_FOUND, Bytes::new());
    }
    if req.method() != Method::GET {
        return respond(StatusCode::METHOD_NOT_ALLOWED, Bytes::new());
    }

    match pipeline.feed(Utc::now()).await {
        Ok(body) => {
            let mut response = respond(StatusCode::OK, Bytes::from(body));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"));
            response
        }
        Err(err) => {
            error!("{}", err);
            respond(StatusCode::SERVICE_UNAVAILABLE, Bytes::new())
        }
    }
}

pub async fn run<S: FeedSource + 'static>(addr: SocketAddr, pipeline: Pipeline<S>) -> RssResult<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("serving feed on http://{}/", listener.local_addr()?);

    serve(listener, Arc::new(pipeline)).await
}

/// Accepts connections forever, one task each.
pub async fn serve<S: FeedSource + 'static>(
    listener: TcpListener,
    pipeline: Arc<Pipeline<S>>,
) -> RssResult<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                error!("accept failed: {}", err);
                continue;
            }
        };
        trace!("connection from {}", peer);

        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let pipeline = pipeline.clone();
                async move { Ok::<_, Infallible>(serve_rss(pipeline, req).await) }
            });

            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                warn!("connection from {} failed: {}", peer, err);
            }
        });
    }
}
