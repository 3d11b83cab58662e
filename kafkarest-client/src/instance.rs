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

use std::{fmt, marker::PhantomData, str::FromStr};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::{ClientConfig, Error, InstanceName, Result, Transport, transport::extend};

/// Embedded format of the records held by the instance.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Avro,
    Binary,
    #[default]
    Json,
}

impl Format {
    /// media type accepted when fetching records in this format
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Avro => "application/vnd.kafka.avro.v2+json",
            Self::Binary => "application/vnd.kafka.binary.v2+json",
            Self::Json => "application/vnd.kafka.json.v2+json",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avro" => Ok(Self::Avro),
            "binary" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            otherwise => Err(Error::UnknownFormat(otherwise.into())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Avro => "avro",
            Self::Binary => "binary",
            Self::Json => "json",
        })
    }
}

/// Where a new instance starts reading when the group has no committed offset.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AutoOffsetReset {
    #[default]
    Earliest,
    Latest,
}

impl FromStr for AutoOffsetReset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            otherwise => Err(Error::UnknownOffsetReset(otherwise.into())),
        }
    }
}

impl fmt::Display for AutoOffsetReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Earliest => "earliest",
            Self::Latest => "latest",
        })
    }
}

/// Body of a successful create instance response.
///
/// `base_uri` is kept as sent by the proxy, it is only parsed when the
/// instance follows relocation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct InstanceDescriptor {
    pub instance_id: Option<String>,
    pub base_uri: Option<String>,
}

/// Outcome of asking the proxy to create an instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Creation {
    Created(InstanceDescriptor),

    /// an instance with this name already exists in the group
    Conflict(InstanceName),
}

impl Creation {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// the descriptor of a created instance, a conflict becomes an error
    pub fn created(self) -> Result<InstanceDescriptor> {
        match self {
            Self::Created(descriptor) => Ok(descriptor),
            Self::Conflict(name) => Err(Error::AlreadyExists {
                name: name.to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct CreateInstance<'a> {
    name: &'a str,
    #[serde(rename = "auto.offset.reset")]
    auto_offset_reset: AutoOffsetReset,
    format: Format,
}

#[derive(Clone, Debug)]
pub struct Builder<C, G> {
    config: C,
    group: G,
    instance: Option<String>,
    topics: Vec<String>,
    partition: i32,
    follow_relocation: bool,
    format: Format,
    auto_offset_reset: AutoOffsetReset,
}

pub type PhantomBuilder = Builder<PhantomData<ClientConfig>, PhantomData<String>>;

impl Default for PhantomBuilder {
    fn default() -> Self {
        Self {
            config: PhantomData,
            group: PhantomData,
            instance: None,
            topics: Vec::new(),
            partition: 0,
            follow_relocation: false,
            format: Format::default(),
            auto_offset_reset: AutoOffsetReset::default(),
        }
    }
}

impl<C, G> Builder<C, G> {
    pub fn config(self, config: ClientConfig) -> Builder<ClientConfig, G> {
        Builder {
            config,
            group: self.group,
            instance: self.instance,
            topics: self.topics,
            partition: self.partition,
            follow_relocation: self.follow_relocation,
            format: self.format,
            auto_offset_reset: self.auto_offset_reset,
        }
    }

    pub fn group(self, group: impl Into<String>) -> Builder<C, String> {
        Builder {
            config: self.config,
            group: group.into(),
            instance: self.instance,
            topics: self.topics,
            partition: self.partition,
            follow_relocation: self.follow_relocation,
            format: self.format,
            auto_offset_reset: self.auto_offset_reset,
        }
    }

    /// instance name, defaults to the slug of the host name
    pub fn instance(self, instance: Option<String>) -> Self {
        Self { instance, ..self }
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();

        if !self.topics.contains(&topic) {
            self.topics.push(topic);
        }

        self
    }

    pub fn topics<I>(self, topics: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        topics
            .into_iter()
            .fold(self, |builder, topic| builder.topic(topic))
    }

    /// partition used by every position operation
    pub fn partition(self, partition: i32) -> Self {
        Self { partition, ..self }
    }

    /// use the base uri returned on creation for every later call
    pub fn follow_relocation(self, follow_relocation: bool) -> Self {
        Self {
            follow_relocation,
            ..self
        }
    }

    pub fn format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    pub fn auto_offset_reset(self, auto_offset_reset: AutoOffsetReset) -> Self {
        Self {
            auto_offset_reset,
            ..self
        }
    }
}

impl Builder<ClientConfig, String> {
    pub fn build(self) -> Result<ConsumerInstance> {
        let transport = Transport::try_from(&self.config)?;
        let name = InstanceName::new(self.instance.as_deref())?;

        let group_url = transport.url(&["consumers", self.group.as_str()])?;
        let instance_url = extend(&group_url, &["instances", name.as_str()])?;

        debug!(%name, %group_url, %instance_url, topics = ?self.topics);

        Ok(ConsumerInstance {
            transport,
            group: self.group,
            name,
            group_url,
            instance_url,
            effective_base: None,
            topics: self.topics,
            partition: self.partition,
            follow_relocation: self.follow_relocation,
            format: self.format,
            auto_offset_reset: self.auto_offset_reset,
        })
    }
}

/// A named consumer instance held by the proxy within a consumer group.
///
/// The instance does not exist on the proxy until [`create_instance`] or
/// [`connect`] succeeds, and is only removed by [`delete_instance`].
///
/// [`create_instance`]: ConsumerInstance::create_instance
/// [`connect`]: ConsumerInstance::connect
/// [`delete_instance`]: ConsumerInstance::delete_instance
#[derive(Clone, Debug)]
pub struct ConsumerInstance {
    pub(crate) transport: Transport,
    pub(crate) group: String,
    pub(crate) name: InstanceName,
    pub(crate) group_url: Url,
    pub(crate) instance_url: Url,

    // set at most once per successful create, when following relocation
    pub(crate) effective_base: Option<Url>,

    pub(crate) topics: Vec<String>,
    pub(crate) partition: i32,
    pub(crate) follow_relocation: bool,
    pub(crate) format: Format,
    pub(crate) auto_offset_reset: AutoOffsetReset,
}

impl ConsumerInstance {
    pub fn builder() -> PhantomBuilder {
        Builder::default()
    }

    pub fn name(&self) -> &InstanceName {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn partition(&self) -> i32 {
        self.partition
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn group_url(&self) -> &Url {
        &self.group_url
    }

    /// the relocated base when one was followed, otherwise the computed url
    pub fn instance_url(&self) -> &Url {
        self.effective_base.as_ref().unwrap_or(&self.instance_url)
    }

    pub fn effective_base(&self) -> Option<&Url> {
        self.effective_base.as_ref()
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        extend(self.instance_url(), segments)
    }

    pub async fn create_instance(&mut self) -> Result<Creation> {
        info!(name = %self.name, url = %self.group_url, "creating instance");

        let response = self
            .transport
            .post(
                self.group_url.clone(),
                &CreateInstance {
                    name: self.name.as_str(),
                    auto_offset_reset: self.auto_offset_reset,
                    format: self.format,
                },
            )
            .await?;

        match response.status() {
            StatusCode::OK => {
                let descriptor = response.json::<InstanceDescriptor>()?;
                debug!(?descriptor);

                if self.follow_relocation
                    && let Some(ref base_uri) = descriptor.base_uri
                {
                    let base_uri = Url::parse(base_uri)
                        .inspect_err(|err| debug!(?err, %base_uri))?;

                    info!(name = %self.name, %base_uri, "following relocation");
                    self.effective_base = Some(base_uri);
                }

                Ok(Creation::Created(descriptor))
            }

            StatusCode::CONFLICT => Ok(Creation::Conflict(self.name.clone())),

            _ => Err(response.into_protocol_error("create instance")),
        }
    }

    pub async fn delete_instance(&self) -> Result<()> {
        info!(name = %self.name, url = %self.instance_url(), "deleting instance");

        self.transport
            .delete(self.instance_url().clone())
            .await?
            .ensure(StatusCode::NO_CONTENT, "delete instance")
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn instance(base: &str) -> Result<ConsumerInstance> {
        ConsumerInstance::builder()
            .config(ClientConfig::builder().base_url(Url::parse(base)?).build())
            .group("audit")
            .instance(Some("reader".into()))
            .topics(["a", "b", "a"])
            .build()
    }

    #[test]
    fn urls() -> Result<()> {
        let instance = instance("http://localhost:8082/")?;

        assert_eq!(
            "http://localhost:8082/consumers/audit",
            instance.group_url().as_str()
        );
        assert_eq!(
            "http://localhost:8082/consumers/audit/instances/reader",
            instance.instance_url().as_str()
        );
        assert_eq!(
            "http://localhost:8082/consumers/audit/instances/reader/positions/beginning",
            instance.endpoint(&["positions", "beginning"])?.as_str()
        );

        Ok(())
    }

    #[test]
    fn topics_are_an_ordered_set() -> Result<()> {
        assert_eq!(&["a", "b"], instance("http://localhost:8082/")?.topics());
        Ok(())
    }

    #[test]
    fn name_is_stable() -> Result<()> {
        let instance = instance("http://localhost:8082/")?;

        let subscription = instance.endpoint(&["subscription"])?;
        let records = instance.endpoint(&["records"])?;

        assert_eq!("reader", instance.name().as_str());
        assert!(subscription.path().contains("/instances/reader/"));
        assert!(records.path().contains("/instances/reader/"));

        Ok(())
    }

    #[test]
    fn create_payload() -> Result<()> {
        assert_eq!(
            json!({"name": "reader", "auto.offset.reset": "latest", "format": "binary"}),
            serde_json::to_value(CreateInstance {
                name: "reader",
                auto_offset_reset: AutoOffsetReset::Latest,
                format: Format::Binary,
            })?
        );

        Ok(())
    }

    #[test]
    fn conflict_as_error() {
        assert!(matches!(
            Creation::Conflict(InstanceName::from_host("reader").unwrap()).created(),
            Err(Error::AlreadyExists { name }) if name == "reader"
        ));
    }

    #[test]
    fn format_media_type() -> Result<()> {
        assert_eq!(
            "application/vnd.kafka.binary.v2+json",
            Format::from_str("binary")?.media_type()
        );
        assert!(matches!(
            Format::from_str("xml"),
            Err(Error::UnknownFormat(_))
        ));

        Ok(())
    }
}
