use crate::common::*;
use crate::config::Upstream;
use reqwest::Client;
use std::time::Duration;

/// The content query endpoint, fetched fresh on every call.
#[derive(Debug)]
pub struct UpstreamSource {
    client: Client,
    url: String,
}

impl UpstreamSource {
    pub fn new(upstream: &Upstream) -> RssResult<UpstreamSource> {
        use RssError::*;

        let mut builder = Client::builder();
        if let Some(secs) = upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(UpstreamSource {
            client: builder.build().map_err(FetchError)?,
            url: upstream.url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedSource for UpstreamSource {
    fn fetch(&self) -> BoxFuture<'_, RssResult<Bytes>> {
        use RssError::*;

        async move {
            trace!("GET {}", self.url);
            let res = self.client.get(&self.url).send().await.map_err(FetchError)?;
            debug!("upstream answered {}", res.status());
            res.bytes().await.map_err(ReadError)
        }
        .boxed()
    }
}
