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

use std::{collections::BTreeMap, fmt, marker::PhantomData, time::Duration};

use url::Url;

#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Builder<B> {
    base_url: B,
    credentials: Option<Credentials>,
    headers: BTreeMap<String, String>,
    verify: bool,
    timeout: Option<Duration>,
}

pub type PhantomBuilder = Builder<PhantomData<Url>>;

impl Default for PhantomBuilder {
    fn default() -> Self {
        Self {
            base_url: PhantomData,
            credentials: None,
            headers: BTreeMap::new(),
            verify: true,
            timeout: None,
        }
    }
}

impl<B> Builder<B> {
    pub fn base_url(self, base_url: Url) -> Builder<Url> {
        Builder {
            base_url,
            credentials: self.credentials,
            headers: self.headers,
            verify: self.verify,
            timeout: self.timeout,
        }
    }

    pub fn credentials(self, credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            ..self
        }
    }

    /// basic authentication is only applied when both halves are present
    pub fn basic_auth(self, username: Option<String>, password: Option<String>) -> Self {
        self.credentials(
            username
                .zip(password)
                .map(|(username, password)| Credentials::new(username, password)),
        )
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        _ = self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    pub fn verify(self, verify: bool) -> Self {
        Self { verify, ..self }
    }

    pub fn timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }
}

impl Builder<Url> {
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            credentials: self.credentials,
            headers: self.headers,
            verify: self.verify,
            timeout: self.timeout,
        }
    }
}

/// Connection settings shared by every request made against the proxy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    base_url: Url,
    credentials: Option<Credentials>,
    headers: BTreeMap<String, String>,
    verify: bool,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn builder() -> PhantomBuilder {
        Builder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// additional headers sent with every request, overriding the defaults
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// verify the TLS certificate presented by the proxy
    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
