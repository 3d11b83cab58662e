// Copyright ⓒ 2024-2025 Peter Morgan <peter.james.morgan@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::{
    Method, RequestBuilder, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::{ClientConfig, Credentials, Error, Result};

pub(crate) const V2_JSON: &str = "application/vnd.kafka.v2+json";

/// Status and body of a single exchange with the proxy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    status: StatusCode,
    body: String,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body)
            .inspect_err(|err| debug!(?err, body = %self.body))
            .map_err(Into::into)
    }

    /// the response when it has the expected status, otherwise a protocol
    /// error for the operation
    pub fn ensure(self, status: StatusCode, operation: &'static str) -> Result<Self> {
        if self.status == status {
            Ok(self)
        } else {
            Err(self.into_protocol_error(operation))
        }
    }

    pub fn into_protocol_error(self, operation: &'static str) -> Error {
        Error::Protocol {
            operation,
            status: self.status,
            body: self.body,
        }
    }
}

/// Authenticated request/response exchange with the proxy.
///
/// Each call performs exactly one HTTP exchange. Retries and deadlines beyond
/// the configured per request timeout are left to the caller.
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    headers: HeaderMap,
}

impl TryFrom<&ClientConfig> for Transport {
    type Error = Error;

    fn try_from(config: &ClientConfig) -> Result<Self, Self::Error> {
        let mut headers = HeaderMap::new();
        _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static(V2_JSON));

        for (name, value) in config.headers() {
            _ = headers.insert(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map(|client| Self {
                client,
                base_url: config.base_url().clone(),
                credentials: config.credentials().cloned(),
                headers,
            })
            .map_err(Into::into)
    }
}

impl Transport {
    /// the base url extended with percent encoded path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        extend(&self.base_url, segments)
    }

    /// default headers merged with the configured headers
    pub fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    pub async fn get(
        &self,
        url: Url,
        query: &[(&str, String)],
        headers: HeaderMap,
    ) -> Result<Response> {
        let request = self.client.get(url).headers(headers);

        self.exchange(
            Method::GET,
            if query.is_empty() {
                request
            } else {
                request.query(query)
            },
        )
        .await
    }

    pub async fn post<T>(&self, url: Url, body: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        self.exchange(
            Method::POST,
            self.client.post(url).headers(self.headers()).json(body),
        )
        .await
    }

    pub async fn delete(&self, url: Url) -> Result<Response> {
        self.exchange(Method::DELETE, self.client.delete(url).headers(self.headers()))
            .await
    }

    async fn exchange(&self, method: Method, request: RequestBuilder) -> Result<Response> {
        let request = match self.credentials {
            Some(ref credentials) => {
                request.basic_auth(credentials.username(), Some(credentials.password()))
            }
            None => request,
        };

        let response = request
            .send()
            .await
            .inspect_err(|err| debug!(%method, ?err))?;

        let status = response.status();
        debug!(%method, url = %response.url(), %status);

        response
            .text()
            .await
            .map(|body| Response { status, body })
            .inspect(|response| debug!(?response))
            .map_err(Into::into)
    }
}

pub(crate) fn extend(url: &Url, segments: &[&str]) -> Result<Url> {
    let mut extended = url.clone();

    _ = extended
        .path_segments_mut()
        .map_err(|()| Error::CannotBeABase(url.clone()))?
        .pop_if_empty()
        .extend(segments);

    Ok(extended)
}
