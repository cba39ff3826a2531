use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Two-line postal address, stored as a JSON document in a `TEXT` column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

impl Address {
    pub fn from_json(s: &str) -> Result<Self, AppError> {
        if s.trim().is_empty() {
            return Ok(Address::default());
        }
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_reads_as_blank_address() {
        assert_eq!(Address::from_json("").unwrap(), Address::default());
    }

    #[test]
    fn missing_lines_default_to_empty() {
        let address = Address::from_json(r#"{"line1":"57th Cross"}"#).unwrap();
        assert_eq!(address.line1, "57th Cross");
        assert_eq!(address.line2, "");
    }
}
