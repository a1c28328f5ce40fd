//! HTTP data source (`http` feature).

use super::{DataSource, LoadError, LoadResult};
use futures::future::{BoxFuture, FutureExt};

/// Fetches the payload with a single GET request. No retries.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl DataSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'static, LoadResult<Vec<u8>>> {
        let client = self.client.clone();
        let url = self.url.clone();
        async move {
            let response = client
                .get(url.as_str())
                .send()
                .await
                .map_err(|err| LoadError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    resource: url,
                    code: status.as_u16(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|err| LoadError::Transport(err.to_string()))?;
            Ok(body.to_vec())
        }
        .boxed()
    }

    fn describe(&self) -> String {
        format!("http:{}", self.url)
    }
}
