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

use std::{fmt, io, sync::Arc};

use httpmock::MockServer;
use kafkarest_client::{ClientConfig, ConsumerInstance};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, filter::ParseError};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    Client(#[from] kafkarest_client::Error),

    #[allow(dead_code)]
    Io(Arc<io::Error>),

    ParseFilter(Arc<ParseError>),
    Url(#[from] url::ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::ParseFilter(Arc::new(value))
    }
}

pub(crate) fn init_tracing() -> Result<DefaultGuard, Error> {
    Ok(tracing::subscriber::set_default(
        tracing_subscriber::fmt()
            .with_level(true)
            .with_line_number(true)
            .with_thread_names(false)
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("kafkarest_client=debug".parse()?),
            )
            .with_test_writer()
            .finish(),
    ))
}

pub(crate) const GROUP: &str = "audit";
pub(crate) const INSTANCE: &str = "reader";

#[allow(dead_code)]
pub(crate) fn instance_path(suffix: &str) -> String {
    format!("/consumers/{GROUP}/instances/{INSTANCE}{suffix}")
}

pub(crate) fn config(server: &MockServer) -> Result<ClientConfig, Error> {
    Url::parse(&server.base_url())
        .map(|base_url| ClientConfig::builder().base_url(base_url).build())
        .map_err(Into::into)
}

#[allow(dead_code)]
pub(crate) fn consumer(server: &MockServer, topics: &[&str]) -> Result<ConsumerInstance, Error> {
    config(server).and_then(|config| {
        ConsumerInstance::builder()
            .config(config)
            .group(GROUP)
            .instance(Some(INSTANCE.into()))
            .topics(topics.iter().copied())
            .build()
            .map_err(Into::into)
    })
}
