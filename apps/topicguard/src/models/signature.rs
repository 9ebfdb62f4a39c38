//! Structural signature of a filter-query record.
//!
//! Literals are recognized by their field names, never by the type path, so
//! `ethereum.FilterQuery`, an aliased import, a dot-import, and an elided
//! element type all match. The defaults describe go-ethereum's
//! `FilterQuery`; a `[signature]` table in the config replaces them.

use crate::error::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterSignature {
    /// Every field the record may set. A literal keyed by anything else is
    /// some other record.
    pub fields: Vec<String>,
    /// Field holding topic constraints.
    pub topics: String,
    /// Field holding the emitting-contract constraint.
    pub addresses: String,
    /// Slice nesting of the topics field (`[][]Hash` is 2).
    pub topics_depth: usize,
    /// Slice nesting of the address field (`[]Address` is 1).
    pub addresses_depth: usize,
}

impl Default for FilterSignature {
    fn default() -> Self {
        Self {
            fields: ["BlockHash", "FromBlock", "ToBlock", "Addresses", "Topics"]
                .map(String::from)
                .to_vec(),
            topics: "Topics".into(),
            addresses: "Addresses".into(),
            topics_depth: 2,
            addresses_depth: 1,
        }
    }
}

impl FilterSignature {
    pub fn accepts(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Expected slice depth of `field`; scalar fields are 0.
    pub fn depth_of(&self, field: &str) -> usize {
        if field == self.topics {
            self.topics_depth
        } else if field == self.addresses {
            self.addresses_depth
        } else {
            0
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::InvalidSignature(
                "`fields` must not be empty".into(),
            ));
        }
        for (role, name) in [("topics", &self.topics), ("addresses", &self.addresses)] {
            if !self.accepts(name) {
                return Err(ConfigError::InvalidSignature(format!(
                    "{role} field `{name}` is not listed in `fields`"
                )));
            }
        }
        if self.topics == self.addresses {
            return Err(ConfigError::InvalidSignature(
                "topics and addresses must be different fields".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_go_ethereum_filter_query() {
        let sig = FilterSignature::default();
        assert!(sig.validate().is_ok());
        assert!(sig.accepts("FromBlock"));
        assert!(!sig.accepts("Address"));
        assert_eq!(sig.depth_of("Topics"), 2);
        assert_eq!(sig.depth_of("Addresses"), 1);
        assert_eq!(sig.depth_of("ToBlock"), 0);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let sig: FilterSignature = toml::from_str("addresses = \"Address\"\nfields = [\"Address\", \"Topics\"]").unwrap();
        assert_eq!(sig.topics, "Topics");
        assert_eq!(sig.addresses_depth, 1);
        assert!(sig.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_roles() {
        let sig = FilterSignature {
            fields: vec!["Topics".into()],
            ..Default::default()
        };
        let err = sig.validate().unwrap_err();
        assert!(err.to_string().contains("`Addresses` is not listed"));

        let empty = FilterSignature {
            fields: Vec::new(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }
}
