//! Post-parse rule validation against the advisory vocabulary.

use crate::compliance::{is_allowed_action, is_prohibited_action};

use super::Rule;

/// Extension prefix for advisory actions not yet in the core
/// vocabulary; such names are accepted without an issue.
const EXTENSION_PREFIX: &str = "RECOMMEND_";

/// Validate structure and action vocabulary, returning human-readable
/// issue strings.
///
/// Validation never mutates or rejects rules; enforcement policy is
/// the caller's decision. An empty result means the rule set is clean.
pub fn validate_rules(rules: &[Rule]) -> Vec<String> {
    let mut issues = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            issues.push("rule without a name".to_string());
        }
        if rule.condition.is_empty() {
            issues.push(format!("rule '{}' has no condition", rule.name));
        }
        if rule.actions.is_empty() {
            issues.push(format!("rule '{}' has no actions", rule.name));
        }
        for action in &rule.actions {
            if is_prohibited_action(&action.name) {
                issues.push(format!(
                    "prohibited action in '{}': {}",
                    rule.name, action.name
                ));
            } else if !is_allowed_action(&action.name)
                && !action.name.starts_with(EXTENSION_PREFIX)
            {
                issues.push(format!(
                    "unexpected action in '{}': {}",
                    rule.name, action.name
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse_rules;

    #[test]
    fn clean_rule_has_no_issues() {
        let rules = parse_rules(
            "RULE \"flip\"\nWHEN price < p50_30d*0.75\nTHEN RECOMMEND_BUY(qty=10)",
        )
        .unwrap();
        assert!(validate_rules(&rules).is_empty());
    }

    #[test]
    fn prohibited_action_is_flagged() {
        let rules = parse_rules("RULE \"bad\"\nWHEN TRUE\nTHEN BUY(qty=1)").unwrap();
        let issues = validate_rules(&rules);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("prohibited action"));
        assert!(issues[0].contains("BUY"));
    }

    #[test]
    fn unknown_action_is_flagged_as_unexpected() {
        let rules = parse_rules("RULE \"odd\"\nWHEN TRUE\nTHEN FROBNICATE(1)").unwrap();
        let issues = validate_rules(&rules);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("unexpected action"));
    }

    #[test]
    fn recommend_extensions_are_soft_allowed() {
        let rules =
            parse_rules("RULE \"ext\"\nWHEN TRUE\nTHEN RECOMMEND_RESERVE(qty=3)").unwrap();
        assert!(validate_rules(&rules).is_empty());
    }

    #[test]
    fn empty_condition_is_flagged() {
        let rules = parse_rules("RULE \"r\"\nWHEN\nTHEN SKIP()").unwrap();
        let issues = validate_rules(&rules);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("no condition"));
    }
}
