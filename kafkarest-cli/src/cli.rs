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

use std::{error::Error, process, str::FromStr, time::Duration};

use crate::Result;
use clap::{Args, Parser, Subcommand};
use kafkarest_client::{AutoOffsetReset, ClientConfig, ConsumerInstance, Format};
use tracing::debug;
use url::Url;

mod consume;
mod delete;
mod subscription;

const DEFAULT_BASE_URL: &str = "http://localhost:8082/";

#[derive(Clone, Debug, Parser)]
#[command(name = "kafkarest", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    client: ClientArg,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Connect a consumer instance and print one batch of records
    Consume(Box<consume::Arg>),

    /// Print the topics a consumer instance is subscribed to
    Subscription(Box<subscription::Arg>),

    /// Delete a consumer instance
    Delete(Box<delete::Arg>),
}

/// Connection to the REST proxy, shared by every command
#[derive(Args, Clone, Debug)]
struct ClientArg {
    /// REST proxy URL
    #[arg(long, global = true, env = "KAFKAREST_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// Username for basic authentication
    #[arg(long, global = true, env = "KAFKAREST_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true, env = "KAFKAREST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Additional request header
    #[arg(long = "header", global = true, value_parser = parse_key_val::<String, String>)]
    headers: Vec<(String, String)>,

    /// Accept an invalid TLS certificate from the proxy
    #[arg(long, global = true)]
    insecure: bool,

    /// Per request timeout
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

impl From<ClientArg> for ClientConfig {
    fn from(value: ClientArg) -> Self {
        ClientConfig::builder()
            .base_url(value.base_url)
            .basic_auth(value.username, value.password)
            .headers(value.headers)
            .verify(!value.insecure)
            .timeout(value.timeout_ms.map(Duration::from_millis))
            .build()
    }
}

/// The consumer instance a command operates on
#[derive(Args, Clone, Debug)]
struct InstanceArg {
    /// Consumer group of the instance
    #[arg(long, env = "KAFKAREST_GROUP")]
    group: String,

    /// Topic consumed by the instance
    #[arg(long = "topic")]
    topics: Vec<String>,

    /// Instance name, defaults to the host name
    #[arg(long, env = "KAFKAREST_INSTANCE")]
    instance: Option<String>,

    /// Partition used when changing position
    #[arg(long, default_value = "0")]
    partition: i32,

    /// Use the base URI returned by the proxy when the instance is created
    #[arg(long)]
    follow_relocation: bool,

    /// Embedded format of the records: json, binary or avro
    #[arg(long, default_value = "json")]
    format: Format,

    /// Where a new instance starts without a committed offset: earliest or latest
    #[arg(long, default_value = "earliest")]
    auto_offset_reset: AutoOffsetReset,
}

impl InstanceArg {
    fn consumer(self, config: ClientConfig) -> Result<ConsumerInstance> {
        ConsumerInstance::builder()
            .config(config)
            .group(self.group)
            .instance(self.instance)
            .topics(self.topics)
            .partition(self.partition)
            .follow_relocation(self.follow_relocation)
            .format(self.format)
            .auto_offset_reset(self.auto_offset_reset)
            .build()
            .inspect(|consumer| debug!(name = %consumer.name(), url = %consumer.instance_url()))
            .map_err(Into::into)
    }
}

impl Cli {
    pub async fn main() -> Result<()> {
        debug!(pid = process::id());

        let cli = Cli::parse();
        let config = ClientConfig::from(cli.client);

        match cli.command {
            Command::Consume(arg) => arg.main(config).await,
            Command::Subscription(arg) => arg.main(config).await,
            Command::Delete(arg) => arg.main(config).await,
        }
        .inspect_err(|err| debug!(?err))
    }
}

fn parse_key_val<T, U>(s: &str) -> Result<(T, U), Box<dyn Error + Send + Sync + 'static>>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
    U: FromStr,
    U::Err: Error + Send + Sync + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn key_val() {
        assert_eq!(
            ("X-Tenant".to_string(), "a=b".to_string()),
            parse_key_val::<String, String>("X-Tenant=a=b").unwrap()
        );

        assert!(parse_key_val::<String, String>("X-Tenant").is_err());
    }

    #[test]
    fn client_config() {
        let cli = Cli::try_parse_from([
            "kafkarest",
            "delete",
            "--group",
            "audit",
            "--base-url",
            "https://proxy:8082/",
            "--username",
            "alice",
            "--password",
            "secret",
            "--header",
            "X-Tenant=blue",
            "--insecure",
            "--timeout-ms",
            "1500",
        ])
        .unwrap();

        let config = ClientConfig::from(cli.client);

        assert_eq!("https://proxy:8082/", config.base_url().as_str());
        assert_eq!(
            Some("alice"),
            config.credentials().map(|credentials| credentials.username())
        );
        assert_eq!(
            Some("blue"),
            config.headers().get("X-Tenant").map(String::as_str)
        );
        assert!(!config.verify());
        assert_eq!(Some(Duration::from_millis(1500)), config.timeout());
    }

    #[test]
    fn instance() {
        let cli = Cli::try_parse_from([
            "kafkarest",
            "consume",
            "--group",
            "audit",
            "--topic",
            "a",
            "--topic",
            "b",
            "--instance",
            "reader",
            "--format",
            "binary",
            "--position",
            "5",
            "--beginning",
        ])
        .unwrap();

        let Command::Consume(arg) = cli.command else {
            panic!("consume expected")
        };

        let consumer = arg
            .instance
            .clone()
            .consumer(ClientConfig::from(cli.client))
            .unwrap();

        assert_eq!("reader", consumer.name().as_str());
        assert_eq!(&["a", "b"], consumer.topics());
        assert_eq!(Format::Binary, consumer.format());
        assert_eq!(Some(5), arg.position);
        assert!(arg.beginning);
    }
}
