//! Live adapter for the `HttpTransport` port using `reqwest`.

use reqwest::header::{HeaderMap, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;

use crate::ports::http::{GraphqlRequest, HttpReply, HttpTransport, TransportFuture};

const USER_AGENT_VALUE: &str = concat!("repoprobe/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Live transport talking to the real code host.
pub struct LiveHttpTransport {
    client: Client,
    token: Option<String>,
}

impl LiveHttpTransport {
    /// Creates a transport that authenticates GraphQL calls with `token`.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { client: Client::new(), token }
    }
}

/// Body of a GraphQL POST.
#[derive(Serialize)]
struct GraphqlBody<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<i64> {
    headers.get(RATE_LIMIT_RESET)?.to_str().ok()?.trim().parse().ok()
}

async fn into_reply(response: Response) -> Result<HttpReply, reqwest::Error> {
    let status = response.status().as_u16();
    let rate_limit_reset = rate_limit_reset(response.headers());
    let body = response.text().await?;
    Ok(HttpReply { status, rate_limit_reset, body })
}

impl HttpTransport for LiveHttpTransport {
    fn post_graphql(&self, request: &GraphqlRequest) -> TransportFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let mut builder = self
                .client
                .post(&request.url)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .json(&GraphqlBody { query: &request.query, variables: &request.variables });
            if let Some(token) = &self.token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }

            let response = builder.send().await.map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("GraphQL request to {} failed: {e}", request.url).into()
                },
            )?;
            into_reply(response).await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                format!("Failed to read GraphQL response: {e}").into()
            })
        })
    }

    fn get(&self, url: &str) -> TransportFuture<'_> {
        let url = url.to_string();

        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("GET {url} failed: {e}").into()
                })?;
            into_reply(response).await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                format!("Failed to read body of {url}: {e}").into()
            })
        })
    }
}
