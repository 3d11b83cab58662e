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

use std::{fmt, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::{Error, Result};

/// The name of a consumer instance within its group.
///
/// A name is derived once and never changes: it joins every create,
/// subscribe, position, fetch and delete call made against the instance.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct InstanceName(String);

impl InstanceName {
    /// an explicit, non empty name is used verbatim, otherwise the name is
    /// the slug of the local host name
    pub fn new(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(name) if !name.is_empty() => Ok(Self(name.into())),

            _ => hostname::get()
                .map_err(Error::from)
                .and_then(|host| Self::from_host(&host.to_string_lossy())),
        }
    }

    pub fn from_host(host: &str) -> Result<Self> {
        let slug = slugify(host);
        debug!(%host, %slug);

        if slug.is_empty() {
            Err(Error::EmptyInstanceName)
        } else {
            Ok(Self(slug))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InstanceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static NOT_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Lowercase, with every run of characters outside `[a-z0-9]` collapsed
/// into a single `-` and leading or trailing `-` removed. Non ASCII
/// characters are not transliterated, they become `-` like any other.
fn slugify(s: &str) -> String {
    NOT_SLUG
        .replace_all(&s.to_lowercase(), "-")
        .trim_matches('-')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit() -> Result<()> {
        assert_eq!("Reader_01", InstanceName::new(Some("Reader_01"))?.as_str());
        Ok(())
    }

    #[test]
    fn empty_explicit_falls_back_to_host() -> Result<()> {
        let name = InstanceName::new(Some(""))?;

        assert!(!name.as_str().is_empty());
        assert!(
            name.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );

        Ok(())
    }

    #[test]
    fn host_slug() -> Result<()> {
        assert_eq!(
            "build-agent-07-eu-west-internal",
            InstanceName::from_host("Build_Agent-07.eu-west.internal")?.as_str()
        );

        assert_eq!("node-1", InstanceName::from_host("..node 1..")?.as_str());

        Ok(())
    }

    #[test]
    fn non_ascii_is_not_transliterated() -> Result<()> {
        assert_eq!("m-nchen-01", InstanceName::from_host("München-01")?.as_str());
        Ok(())
    }

    #[test]
    fn host_without_usable_characters() {
        assert!(matches!(
            InstanceName::from_host("..."),
            Err(Error::EmptyInstanceName)
        ));
    }
}
