use std::future::Future;
use std::time::Duration;

use scopecore::feed::record::FeedDocument;
use scopecore::prelude::{FeedError, FeedResult, FeedSource};

/// How long one upstream request may take before the sweep gives up.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// tar1090-style HTTP feed with a bounded per-request timeout.
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to build feed http client");
        Self { client, url }
    }
}

impl FeedSource for HttpFeedSource {
    fn poll(&mut self) -> impl Future<Output = FeedResult<FeedDocument>> + Send {
        let request = self.client.get(&self.url).send();
        async move {
            let response = request
                .await
                .map_err(|err| FeedError::Transport(err.to_string()))?;
            if !response.status().is_success() {
                return Err(FeedError::Status(response.status().as_u16()));
            }
            response
                .json::<FeedDocument>()
                .await
                .map_err(|err| FeedError::Decode(err.to_string()))
        }
    }
}
