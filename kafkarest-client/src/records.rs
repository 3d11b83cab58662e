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

use reqwest::{
    StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{ConsumerInstance, Error, Result};

/// A record fetched from the instance, key and value left as sent by the proxy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record {
    pub topic: String,
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub value: Value,
    pub partition: i32,
    pub offset: i64,
}

impl ConsumerInstance {
    /// Fetch the next batch of records available to the instance.
    ///
    /// Each call consumes the batch on the proxy. An empty batch just means
    /// nothing is available yet.
    pub async fn fetch_records(&self, max_bytes: Option<u64>) -> Result<Vec<Record>> {
        let url = self.endpoint(&["records"])?;
        info!(name = %self.name, %url, ?max_bytes, "fetching records");

        let query = max_bytes
            .filter(|max_bytes| *max_bytes > 0)
            .map(|max_bytes| vec![("max_bytes", max_bytes.to_string())])
            .unwrap_or_default();

        let mut headers = self.transport.headers();
        _ = headers.remove(CONTENT_TYPE);
        _ = headers.insert(ACCEPT, HeaderValue::from_static(self.format.media_type()));

        let response = self.transport.get(url, &query, headers).await?;

        if response.status() == StatusCode::OK {
            response
                .json::<Vec<Record>>()
                .inspect(|records| debug!(records = records.len()))
        } else {
            Err(Error::Consumer {
                status: response.status(),
                body: response.body().to_owned(),
            })
        }
    }
}
