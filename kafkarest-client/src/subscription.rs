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

use std::collections::BTreeSet;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ConsumerInstance, Error, Result};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
struct Topics<T> {
    #[serde(default)]
    topics: T,
}

/// true when the active subscription already includes every desired topic
pub(crate) fn covers(current: &BTreeSet<String>, desired: &[String]) -> bool {
    !current.is_empty() && desired.iter().all(|topic| current.contains(topic))
}

impl ConsumerInstance {
    /// The topics the instance is subscribed to right now.
    ///
    /// The proxy answers 404 while no consumer session is active, which is
    /// reported as an empty subscription, as are missing or null topics.
    pub async fn current_subscription(&self) -> Result<BTreeSet<String>> {
        let url = self.endpoint(&["subscription"])?;
        info!(name = %self.name, %url, "checking active subscription");

        let response = self
            .transport
            .get(url, &[], self.transport.headers())
            .await?;

        match response.status() {
            StatusCode::OK => response
                .json::<Topics<Option<BTreeSet<String>>>>()
                .map(|subscription| subscription.topics.unwrap_or_default())
                .inspect(|topics| debug!(?topics)),

            StatusCode::NOT_FOUND => {
                debug!("no active consumer, no active subscription");
                Ok(BTreeSet::new())
            }

            _ => Err(response.into_protocol_error("get subscription")),
        }
    }

    /// Subscribe the instance to every desired topic.
    ///
    /// The proxy replaces any prior subscription with this one.
    pub async fn subscribe(&self) -> Result<()> {
        let url = self.endpoint(&["subscription"])?;
        info!(name = %self.name, topics = ?self.topics, "subscribing");

        let response = self
            .transport
            .post(
                url,
                &Topics {
                    topics: &self.topics[..],
                },
            )
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(Error::Subscription {
                status: response.status(),
                body: response.body().to_owned(),
            })
        }
    }

    /// whether the desired topics still need a subscribe
    pub fn needs_subscribe(&self, current: &BTreeSet<String>) -> bool {
        !covers(current, &self.topics)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn set(topics: &[&str]) -> BTreeSet<String> {
        topics.iter().map(|topic| topic.to_string()).collect()
    }

    fn desired(topics: &[&str]) -> Vec<String> {
        topics.iter().map(|topic| topic.to_string()).collect()
    }

    #[test]
    fn superset_covers() {
        assert!(covers(&set(&["a", "b", "c"]), &desired(&["a", "b"])));
        assert!(covers(&set(&["a", "b"]), &desired(&["b", "a"])));
    }

    #[test]
    fn partial_or_empty_does_not_cover() {
        assert!(!covers(&set(&["a"]), &desired(&["a", "b"])));
        assert!(!covers(&set(&[]), &desired(&["a"])));
        assert!(!covers(&set(&[]), &desired(&[])));
    }

    #[test]
    fn subscribe_payload() -> Result<()> {
        let topics = desired(&["a", "b"]);

        assert_eq!(
            json!({"topics": ["a", "b"]}),
            serde_json::to_value(Topics {
                topics: &topics[..]
            })?
        );

        Ok(())
    }

    #[test]
    fn missing_or_null_topics_are_empty() -> Result<()> {
        for body in ["{}", r#"{"topics": null}"#] {
            let subscription = serde_json::from_str::<Topics<Option<BTreeSet<String>>>>(body)?;
            assert_eq!(None, subscription.topics);
        }
        Ok(())
    }
}
