//! Front-matter parsing

use serde::{Deserialize, Deserializer};

/// Fence that opens and closes the metadata block
const FENCE: &str = "---";

/// Accepts `tags: svelte`, `tags: [svelte, sveltekit]` and `tags:` alike
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut tags = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                tags.push(item);
            }
            Ok(tags)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Raw metadata block of a post, before validation
///
/// Every field is optional here; `PostMeta` decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub cover: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    pub published: Option<bool>,
}

impl FrontMatter {
    /// Split a source file into its metadata block and markdown body.
    ///
    /// Returns `Ok(None)` when the file has no fenced block at the top.
    pub fn parse(content: &str) -> Result<Option<(Self, &str)>, serde_yaml::Error> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix(FENCE) else {
            return Ok(None);
        };
        // The opening fence must be alone on its line
        let Some(rest) = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
        else {
            return Ok(None);
        };

        let (yaml, body) = match find_closing_fence(rest) {
            Some((end, body_start)) => (&rest[..end], &rest[body_start..]),
            None => return Ok(None),
        };

        let body = body.trim_start_matches(['\n', '\r']);
        if yaml.trim().is_empty() {
            return Ok(Some((FrontMatter::default(), body)));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok(Some((fm, body)))
    }
}

/// Locate the closing `---` line. Returns (end of yaml, start of body).
fn find_closing_fence(rest: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}
