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

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ConsumerInstance, Error, Result};

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TopicPartitionOffset {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Offsets {
    pub(crate) offsets: Vec<TopicPartitionOffset>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Partitions {
    pub(crate) partitions: Vec<TopicPartition>,
}

impl ConsumerInstance {
    pub(crate) fn offsets(&self, offset: i64) -> Offsets {
        Offsets {
            offsets: self
                .topics
                .iter()
                .map(|topic| TopicPartitionOffset {
                    topic: topic.clone(),
                    partition: self.partition,
                    offset,
                })
                .collect(),
        }
    }

    pub(crate) fn partitions(&self) -> Partitions {
        Partitions {
            partitions: self
                .topics
                .iter()
                .map(|topic| TopicPartition {
                    topic: topic.clone(),
                    partition: self.partition,
                })
                .collect(),
        }
    }

    /// Move the read position of every desired topic to `offset`.
    ///
    /// The proxy answers with a single status for the whole batch.
    pub async fn seek_to_offset(&self, offset: i64) -> Result<()> {
        let url = self.endpoint(&["positions"])?;
        info!(name = %self.name, offset, topics = ?self.topics, "changing position");

        self.transport
            .post(url, &self.offsets(offset))
            .await?
            .ensure(StatusCode::NO_CONTENT, "seek to offset")
            .map(|_| ())
    }

    pub async fn seek_to_beginning(&self) -> Result<()> {
        let url = self.endpoint(&["positions", "beginning"])?;
        info!(name = %self.name, topics = ?self.topics, "changing position to beginning");

        self.transport
            .post(url, &self.partitions())
            .await?
            .ensure(StatusCode::NO_CONTENT, "seek to beginning")
            .map(|_| ())
    }

    pub async fn seek_to_end(&self) -> Result<()> {
        Err(Error::Unsupported("seek to end"))
    }
}
