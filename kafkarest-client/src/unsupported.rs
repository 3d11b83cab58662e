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

//! Proxy operations this client does not implement.
//!
//! Each fails with [`Error::Unsupported`] rather than guessing at the
//! behaviour a caller expects.

use serde_json::Value;

use crate::{ConsumerInstance, Error, Result, TopicPartition, TopicPartitionOffset};

impl ConsumerInstance {
    pub async fn list_topics(&self) -> Result<Vec<String>> {
        Err(Error::Unsupported("list topics"))
    }

    pub async fn topic_info(&self, _topic: &str) -> Result<Value> {
        Err(Error::Unsupported("topic info"))
    }

    pub async fn topic_partitions(&self, _topic: &str) -> Result<Vec<Value>> {
        Err(Error::Unsupported("topic partitions"))
    }

    pub async fn topic_partition_metadata(&self, _topic: &str, _partition: i32) -> Result<Value> {
        Err(Error::Unsupported("topic partition metadata"))
    }

    pub async fn commit_offsets(&self, _offsets: &[TopicPartitionOffset]) -> Result<()> {
        Err(Error::Unsupported("commit offsets"))
    }

    pub async fn committed_offsets(
        &self,
        _partitions: &[TopicPartition],
    ) -> Result<Vec<TopicPartitionOffset>> {
        Err(Error::Unsupported("committed offsets"))
    }

    pub async fn unsubscribe(&self) -> Result<()> {
        Err(Error::Unsupported("unsubscribe"))
    }

    pub async fn assign(&self, _partitions: &[TopicPartition]) -> Result<()> {
        Err(Error::Unsupported("assign partitions"))
    }

    pub async fn assignments(&self) -> Result<Vec<TopicPartition>> {
        Err(Error::Unsupported("assignments"))
    }
}
