use crate::{Error, Result};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Location of the generated text inside a model response, written as
/// `output.message.content[0].text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePath(Vec<Segment>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl ResponsePath {
    /// Response schema of the Nova family.
    pub fn nova() -> Self {
        Self(vec![
            Segment::Key("output".to_string()),
            Segment::Key("message".to_string()),
            Segment::Key("content".to_string()),
            Segment::Index(0),
            Segment::Key("text".to_string()),
        ])
    }

    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a str> {
        self.0
            .iter()
            .try_fold(value, |node, segment| match segment {
                Segment::Key(key) => node.get(key),
                Segment::Index(index) => node.get(index),
            })
            .and_then(Value::as_str)
    }

    /// Reads the generated text from a raw response body.
    ///
    /// A body that is not JSON is always an error. A missing path yields an
    /// empty string unless `strict` is set.
    pub fn extract(&self, raw: &[u8], strict: bool) -> Result<String> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| Error::invocation(format!("Invalid response from model: {}", e)))?;

        match self.lookup(&value) {
            Some(text) => Ok(text.to_string()),
            None if strict => Err(Error::invocation(format!(
                "Response path '{}' not found",
                self
            ))),
            None => Ok(String::new()),
        }
    }
}

impl Default for ResponsePath {
    fn default() -> Self {
        Self::nova()
    }
}

impl FromStr for ResponsePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::config(format!("invalid response path: '{}'", s));

        let mut segments = Vec::new();
        for part in s.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };

            if (key.is_empty() && rest.is_empty()) || key.contains(']') {
                return Err(invalid());
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(invalid)?;
                if !rest.starts_with('[') {
                    return Err(invalid());
                }
                let index = rest[1..close].parse::<usize>().map_err(|_| invalid())?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
            }
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
