//! Identity and wording of the `ethereum-filter-without-address` rule.

use crate::models::signature::FilterSignature;
use crate::models::Severity;
use serde::Serialize;

pub const RULE_ID: &str = "ethereum-filter-without-address";

#[derive(Debug, Clone, Serialize)]
/// Rule metadata printed by `topicguard rules`.
pub struct RuleInfo {
    pub id: &'static str,
    pub severity: Severity,
    pub description: String,
}

/// Finding message, phrased with the configured field names.
pub fn message(signature: &FilterSignature) -> String {
    format!(
        "filter query sets `{}` but not `{}`: logs from any contract match, so a forged event is accepted as genuine; restrict `{}` to the expected contract",
        signature.topics, signature.addresses, signature.addresses
    )
}

pub fn describe(signature: &FilterSignature, severity: Severity) -> RuleInfo {
    RuleInfo {
        id: RULE_ID,
        severity,
        description: format!(
            "Flags event-log filter queries (records keyed by {}) that constrain `{}` without constraining `{}`.",
            signature.fields.join(", "),
            signature.topics,
            signature.addresses
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_configured_fields() {
        let sig = FilterSignature {
            fields: vec!["Topics".into(), "Address".into()],
            addresses: "Address".into(),
            ..Default::default()
        };
        let msg = message(&sig);
        assert!(msg.starts_with("filter query sets `Topics` but not `Address`"));
        let info = describe(&sig, Severity::Error);
        assert_eq!(info.id, RULE_ID);
        assert!(info.description.contains("Topics, Address"));
    }
}
