//! Rule registry.

use crate::{OnlyImportFromIndex, OnlyRequireFromIndex};
use index_lint_core::RuleBox;

/// Returns every built-in rule with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(OnlyImportFromIndex::new()),
        Box::new(OnlyRequireFromIndex::new()),
    ]
}

/// Looks up built-in rules by name or code.
///
/// Unknown entries are logged and skipped.
#[must_use]
pub fn rules_by_names(names: &[&str]) -> Vec<RuleBox> {
    let mut rules = Vec::new();
    for name in names {
        let found = all_rules()
            .into_iter()
            .find(|rule| rule.name() == *name || rule.code() == *name);
        match found {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rules_have_unique_codes() {
        let rules = all_rules();
        let mut codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
    }

    #[test]
    fn lookup_by_name_or_code() {
        assert_eq!(rules_by_names(&["only-import-from-index"]).len(), 1);
        assert_eq!(rules_by_names(&["IDX001"]).len(), 1);
        assert!(rules_by_names(&["no-such-rule"]).is_empty());
        assert_eq!(rules_by_names(&["IDX002", "only-import-from-index"]).len(), 2);
    }

    #[test]
    fn only_the_primary_rule_is_on_by_default() {
        let enabled: Vec<&str> = all_rules()
            .iter()
            .filter(|r| r.enabled_by_default())
            .map(|r| r.code())
            .collect();
        assert_eq!(enabled, vec!["IDX001"]);
    }
}
