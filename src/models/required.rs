use serde::Deserialize;

/// A string that must contain something other than whitespace.
///
/// Rejected during deserialization, so request bodies with a blank field
/// never reach a handler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Required(String);

impl Required {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Required {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            Err("value must not be empty")
        } else {
            Ok(Self(value))
        }
    }
}
