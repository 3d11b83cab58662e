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

use std::io::{self, Write as _};

use clap::Args;
use kafkarest_client::ClientConfig;
use tracing::debug;

use super::InstanceArg;
use crate::Result;

#[derive(Args, Clone, Debug)]
pub(super) struct Arg {
    #[command(flatten)]
    pub(super) instance: InstanceArg,

    /// Delete an existing instance with the same name before connecting
    #[arg(long)]
    pub(super) clear: bool,

    /// Move to this offset on every topic before fetching
    #[arg(long)]
    pub(super) position: Option<i64>,

    /// Move to the beginning of every topic before fetching
    #[arg(long)]
    pub(super) beginning: bool,

    /// Upper bound on the size of the fetched batch
    #[arg(long)]
    pub(super) max_bytes: Option<u64>,
}

impl Arg {
    pub(super) async fn main(self, config: ClientConfig) -> Result<()> {
        let mut consumer = self.instance.consumer(config)?;

        consumer.connect(self.clear).await?;

        let records = consumer
            .consume(self.position, self.beginning, self.max_bytes)
            .await
            .inspect(|records| debug!(records = records.len()))?;

        let mut stdout = io::stdout().lock();

        for record in records {
            let line = serde_json::to_string(&record)?;
            writeln!(stdout, "{line}")?;
        }

        Ok(())
    }
}
