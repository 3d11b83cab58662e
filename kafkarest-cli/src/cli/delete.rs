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

use clap::Args;
use kafkarest_client::ClientConfig;

use super::InstanceArg;
use crate::Result;

#[derive(Args, Clone, Debug)]
pub(super) struct Arg {
    #[command(flatten)]
    pub(super) instance: InstanceArg,
}

impl Arg {
    pub(super) async fn main(self, config: ClientConfig) -> Result<()> {
        self.instance
            .consumer(config)?
            .delete_instance()
            .await
            .map_err(Into::into)
    }
}
