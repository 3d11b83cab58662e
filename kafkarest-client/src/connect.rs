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

use tracing::{debug, info, warn};

use crate::{ConsumerInstance, Creation, Error, Record, Result, subscription::covers};

/// What to do when the instance already exists on the proxy.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
enum OnConflict {
    /// assume the existing instance is usable
    Continue,

    /// delete the existing instance and start again
    Clear,

    /// the existing instance was already deleted once
    Fail,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
enum State {
    Unconnected,
    SubscriptionChecked { covered: bool },
    InstanceEnsured { covered: bool },
    Ready,
}

impl ConsumerInstance {
    /// Bring the instance to a state where records can be fetched.
    ///
    /// The subscription is checked first, then the instance is created. An
    /// instance left behind by an earlier process with the same name is
    /// either reused or, with `clear`, deleted before the whole procedure
    /// runs once more. Finally the desired topics are subscribed unless the
    /// active subscription already covers them.
    ///
    /// The subscribe comes after the create, not before it: the proxy cannot
    /// subscribe an instance that does not exist yet.
    pub async fn connect(&mut self, clear: bool) -> Result<()> {
        let mut on_conflict = if clear {
            OnConflict::Clear
        } else {
            OnConflict::Continue
        };

        let mut state = State::Unconnected;

        loop {
            debug!(?state, ?on_conflict);

            state = match state {
                State::Unconnected => {
                    let current = self.current_subscription().await?;

                    State::SubscriptionChecked {
                        covered: covers(&current, &self.topics),
                    }
                }

                State::SubscriptionChecked { covered } => {
                    match (self.create_instance().await?, on_conflict) {
                        (Creation::Created(_), _) => State::InstanceEnsured { covered },

                        (Creation::Conflict(name), OnConflict::Continue) => {
                            warn!(%name, "instance already exists, continuing with it");
                            State::InstanceEnsured { covered }
                        }

                        (Creation::Conflict(name), OnConflict::Clear) => {
                            info!(%name, "clearing previous session");
                            self.delete_instance().await?;
                            on_conflict = OnConflict::Fail;
                            State::Unconnected
                        }

                        (Creation::Conflict(name), OnConflict::Fail) => {
                            return Err(Error::AlreadyExists {
                                name: name.to_string(),
                            });
                        }
                    }
                }

                State::InstanceEnsured { covered } => {
                    if !covered {
                        self.subscribe().await?;
                    }

                    State::Ready
                }

                State::Ready => return Ok(()),
            }
        }
    }

    /// Optionally reposition, then fetch one batch of records.
    ///
    /// An absolute `position` takes precedence over `beginning`.
    pub async fn consume(
        &self,
        position: Option<i64>,
        beginning: bool,
        max_bytes: Option<u64>,
    ) -> Result<Vec<Record>> {
        if let Some(position) = position {
            self.seek_to_offset(position).await?;
        } else if beginning {
            self.seek_to_beginning().await?;
        }

        self.fetch_records(max_bytes).await
    }
}
