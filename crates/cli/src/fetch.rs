//! Downloading a schema from a running service.
//!
//! A base URL is probed at a fixed list of candidate endpoints. OpenAPI
//! candidates are plain `GET`s that must answer `200`; GraphQL candidates
//! `POST` the introspection query and use the `data` member of the answer.
//! The first candidate that yields a schema of the expected kind wins.

use std::collections::BTreeMap;
use std::time::Duration;

use clap::ValueEnum;
use clientgen_core::Schema;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::source::decode;

/// Retries after the first attempt when a retry delay is configured.
const MAX_RETRIES: u32 = 3;

const INTROSPECTION_QUERY: &str = r"
    query IntrospectionQuery {
      __schema {
        queryType { name }
        mutationType { name }
        subscriptionType { name }
        types {
          ...FullType
        }
        directives {
          name
          description
          locations
          args {
            ...InputValue
          }
        }
      }
    }

    fragment FullType on __Type {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          ...InputValue
        }
        type {
          ...TypeRef
        }
        isDeprecated
        deprecationReason
      }
      inputFields {
        ...InputValue
      }
      interfaces {
        ...TypeRef
      }
      enumValues(includeDeprecated: true) {
        name
        description
        isDeprecated
        deprecationReason
      }
      possibleTypes {
        ...TypeRef
      }
    }

    fragment InputValue on __InputValue {
      name
      description
      type { ...TypeRef }
      defaultValue
    }

    fragment TypeRef on __Type {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
                ofType {
                  kind
                  name
                  ofType {
                    kind
                    name
                  }
                }
              }
            }
          }
        }
      }
    }
";

/// Schema flavour requested with `--type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// OpenAPI / Swagger document.
    Openapi,
    /// GraphQL introspection.
    Graphql,
}

/// One endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// What the endpoint is expected to serve.
    pub kind: SourceKind,
    /// Absolute URL.
    pub url: String,
}

impl Candidate {
    fn new(kind: SourceKind, url: String) -> Self {
        Self { kind, url }
    }
}

/// Endpoints to probe for `base`, in order.
pub fn candidates(base: &str, kind: Option<SourceKind>) -> Vec<Candidate> {
    let openapi_docs = Candidate::new(SourceKind::Openapi, format!("{base}/documentation/json"));
    let graphql_endpoint = Candidate::new(SourceKind::Graphql, format!("{base}/graphql"));
    let openapi_base = Candidate::new(SourceKind::Openapi, base.to_string());
    let graphql_base = Candidate::new(SourceKind::Graphql, base.to_string());

    match kind {
        Some(SourceKind::Openapi) => vec![openapi_docs, openapi_base],
        Some(SourceKind::Graphql) => vec![graphql_endpoint, graphql_base],
        None => vec![openapi_docs, graphql_endpoint, openapi_base, graphql_base],
    }
}

/// A schema obtained from a service.
#[derive(Debug, Clone)]
pub struct Acquired {
    /// The classified schema.
    pub schema: Schema,
    /// The document as served, written out next to OpenAPI clients.
    pub document: Value,
    /// Endpoint that answered the introspection query.
    pub graphql_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct IntrospectionRequest<'a> {
    query: &'a str,
}

/// HTTP side of schema acquisition.
#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    auth_headers: BTreeMap<String, String>,
    retry_delay: Option<Duration>,
}

impl Fetcher {
    /// `auth_headers` is a JSON object of header names to values sent with
    /// OpenAPI downloads. An invalid object is logged and ignored.
    /// `retry_timeout_ms` enables retries starting at that delay.
    pub fn new(auth_headers: Option<&str>, retry_timeout_ms: Option<u64>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| format!("Failed to build HTTP client: {err}"))?;

        let auth_headers = match auth_headers.map(serde_json::from_str) {
            Some(Ok(headers)) => headers,
            Some(Err(err)) => {
                error!("Ignoring invalid url auth headers: {err}");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            client,
            auth_headers,
            retry_delay: retry_timeout_ms.map(Duration::from_millis),
        })
    }

    /// Probe every candidate for `base` until one yields a schema.
    pub async fn acquire(&self, base: &str, kind: Option<SourceKind>) -> Result<Acquired, String> {
        for candidate in candidates(base, kind) {
            let attempt = match candidate.kind {
                SourceKind::Openapi => self.fetch_openapi(&candidate.url).await,
                SourceKind::Graphql => self.fetch_graphql(&candidate.url).await,
            };
            match attempt {
                Ok(acquired) => return Ok(acquired),
                Err(err) => debug!(url = %candidate.url, "Candidate rejected: {err}"),
            }
        }
        Err(format!(
            "Could not find a valid OpenAPI or GraphQL schema at {base}"
        ))
    }

    async fn fetch_openapi(&self, url: &str) -> Result<Acquired, String> {
        debug!("Trying to download OpenAPI schema from {url}");
        let response = self
            .send(|| {
                self.auth_headers
                    .iter()
                    .fold(self.client.get(url), |req, (name, value)| {
                        req.header(name.as_str(), value.as_str())
                    })
            })
            .await?;
        if response.status() != StatusCode::OK {
            return Err(format!("answered {}", response.status()));
        }

        let text = response
            .text()
            .await
            .map_err(|err| format!("failed to read body: {err}"))?;
        let document = decode(&text).map_err(|err| err.to_string())?.into_value();
        match Schema::from_value(document.clone()).map_err(|err| err.to_string())? {
            schema @ Schema::OpenApi(_) => Ok(Acquired {
                schema,
                document,
                graphql_url: None,
            }),
            Schema::GraphQl(_) => Err("served a GraphQL schema".to_string()),
        }
    }

    async fn fetch_graphql(&self, url: &str) -> Result<Acquired, String> {
        debug!("Trying to download GraphQL schema from {url}");
        let body = IntrospectionRequest {
            query: INTROSPECTION_QUERY,
        };
        let response = self.send(|| self.client.post(url).json(&body)).await?;
        if response.status() != StatusCode::OK {
            return Err(format!("answered {}", response.status()));
        }

        let mut answer: Value = response
            .json()
            .await
            .map_err(|err| format!("invalid introspection answer: {err}"))?;
        let data = answer
            .get_mut("data")
            .map(Value::take)
            .ok_or("introspection answer has no data")?;
        match Schema::from_value(data.clone()).map_err(|err| err.to_string())? {
            schema @ Schema::GraphQl(_) => Ok(Acquired {
                schema,
                document: data,
                graphql_url: Some(url.to_string()),
            }),
            Schema::OpenApi(_) => Err("served an OpenAPI document".to_string()),
        }
    }

    /// Send the request built by `build`, retrying transport failures and
    /// `429`/`5xx` answers with a doubling delay when retries are enabled.
    async fn send<F>(&self, build: F) -> Result<Response, String>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            let result = build().send().await;
            let retryable = match &result {
                Ok(response) => {
                    response.status().is_server_error()
                        || response.status() == StatusCode::TOO_MANY_REQUESTS
                }
                Err(err) => err.is_connect() || err.is_timeout(),
            };

            match delay {
                Some(wait) if retryable && attempt < MAX_RETRIES => {
                    attempt += 1;
                    warn!(attempt, delay = ?wait, "Request failed, retrying.");
                    tokio::time::sleep(wait).await;
                    delay = Some(wait * 2);
                }
                _ => return result.map_err(|err| format!("request failed: {err}")),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn urls(list: &[Candidate]) -> Vec<(SourceKind, &str)> {
        list.iter().map(|c| (c.kind, c.url.as_str())).collect()
    }

    #[test]
    fn test_openapi_candidates() {
        let list = candidates("http://localhost:3042", Some(SourceKind::Openapi));
        assert_eq!(
            urls(&list),
            vec![
                (SourceKind::Openapi, "http://localhost:3042/documentation/json"),
                (SourceKind::Openapi, "http://localhost:3042"),
            ]
        );
    }

    #[test]
    fn test_untyped_candidates_interleave() {
        let list = candidates("http://api", None);
        assert_eq!(
            urls(&list),
            vec![
                (SourceKind::Openapi, "http://api/documentation/json"),
                (SourceKind::Graphql, "http://api/graphql"),
                (SourceKind::Openapi, "http://api"),
                (SourceKind::Graphql, "http://api"),
            ]
        );
    }

    #[test]
    fn test_invalid_auth_headers_are_ignored() {
        let fetcher = Fetcher::new(Some("not json"), None).unwrap();
        assert!(fetcher.auth_headers.is_empty());

        let fetcher = Fetcher::new(Some(r#"{ "authorization": "Bearer x" }"#), Some(10)).unwrap();
        assert_eq!(fetcher.auth_headers["authorization"], "Bearer x");
        assert_eq!(fetcher.retry_delay, Some(Duration::from_millis(10)));
    }
}
