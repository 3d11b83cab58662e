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

//! Client for the consumer instances managed by a Kafka REST proxy.
//!
//! A [`ConsumerInstance`] is a named, server side consumer living inside a
//! consumer group. The proxy owns its state: this crate creates it (or
//! recovers one left behind by an earlier process), reconciles its
//! subscription, moves its read position and polls it for records.
//!
//! ```no_run
//! # use kafkarest_client::{ClientConfig, ConsumerInstance, Result};
//! # use url::Url;
//! # async fn run() -> Result<()> {
//! let config = ClientConfig::builder()
//!     .base_url(Url::parse("http://localhost:8082/")?)
//!     .build();
//!
//! let mut consumer = ConsumerInstance::builder()
//!     .config(config)
//!     .group("audit")
//!     .topic("/streams/audit:events")
//!     .build()?;
//!
//! consumer.connect(false).await?;
//!
//! for record in consumer.consume(None, true, None).await? {
//!     println!("{}", record.value);
//! }
//! # Ok(())
//! # }
//! ```

use std::{fmt, io, result, sync::Arc};

use reqwest::StatusCode;
use url::Url;

mod config;
mod connect;
mod identity;
mod instance;
mod position;
mod records;
mod subscription;
mod transport;
mod unsupported;

pub use config::{ClientConfig, Credentials};
pub use identity::InstanceName;
pub use instance::{AutoOffsetReset, ConsumerInstance, Creation, Format, InstanceDescriptor};
pub use position::{TopicPartition, TopicPartitionOffset};
pub use records::Record;
pub use transport::{Response, Transport};

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    AlreadyExists {
        name: String,
    },
    CannotBeABase(Url),
    Consumer {
        status: StatusCode,
        body: String,
    },
    EmptyInstanceName,
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
    Io(Arc<io::Error>),
    Protocol {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    Reqwest(#[from] reqwest::Error),
    SerdeJson(#[from] serde_json::Error),
    Subscription {
        status: StatusCode,
        body: String,
    },
    UnknownFormat(String),
    UnknownOffsetReset(String),
    Unsupported(&'static str),
    Url(#[from] url::ParseError),
}

impl Error {
    /// conflicts and subscription failures leave the instance usable, the
    /// caller decides what happens next
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::Subscription { .. })
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists { name } => write!(f, "instance {name} already exists"),
            Self::Consumer { status, body } => write!(f, "consuming records: [{status}] {body}"),
            Self::Protocol {
                operation,
                status,
                body,
            } => write!(f, "{operation}: [{status}] {body}"),
            Self::Subscription { status, body } => write!(f, "subscription: [{status}] {body}"),
            Self::Unsupported(operation) => write!(f, "{operation} is not supported"),
            error => write!(f, "{error:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_carries_status_and_body() {
        let error = Error::Protocol {
            operation: "seek to beginning",
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "partition not assigned".into(),
        };

        assert_eq!(
            "seek to beginning: [500 Internal Server Error] partition not assigned",
            error.to_string()
        );
        assert!(!error.is_recoverable());
    }

    #[test]
    fn recoverable() {
        assert!(
            Error::AlreadyExists {
                name: "abc".into()
            }
            .is_recoverable()
        );

        assert!(
            Error::Subscription {
                status: StatusCode::CONFLICT,
                body: "".into()
            }
            .is_recoverable()
        );

        assert!(!Error::Unsupported("seek to end").is_recoverable());
    }
}
