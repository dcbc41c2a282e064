use crate::config::{Config, Granularity, IgnorePattern};

/// The attribute gate the derived rules are scoped under. Toggling this
/// attribute on the document root is the only runtime switch the generated
/// CSS depends on.
pub const DARK_THEME_ATTRIBUTE: &str = "[dark-theme=\"true\"]";

/// Decides which selectors of a block take part in the derived stylesheet and
/// rewrites the survivors into dark-theme-scoped form.
#[derive(Debug, Clone)]
pub struct SelectorPolicy {
    ignore: Vec<IgnorePattern>,
    granularity: Granularity,
}

impl SelectorPolicy {
    pub fn new(ignore: Vec<IgnorePattern>, granularity: Granularity) -> Self {
        Self {
            ignore,
            granularity,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ignore.clone(), config.granularity)
    }

    /// The rewritten selector list for a block. An empty result means the
    /// block is skipped entirely.
    pub fn filter(&self, selectors: &[String]) -> Vec<String> {
        if self.granularity == Granularity::Block
            && selectors.iter().any(|s| self.is_ignored(s))
        {
            return Vec::new();
        }

        selectors
            .iter()
            .filter(|s| !self.is_ignored(s))
            .map(|s| rewrite(s))
            .collect()
    }

    fn is_ignored(&self, selector: &str) -> bool {
        self.ignore.iter().any(|pattern| pattern.matches(selector))
    }
}

impl Default for SelectorPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Scope a selector under the dark-theme root attribute. The universal scope
/// selector takes the attribute itself; everything else is gated through a
/// descendant combinator.
fn rewrite(selector: &str) -> String {
    if selector == ":root" {
        return format!(":root{DARK_THEME_ATTRIBUTE}");
    }
    format!("{DARK_THEME_ATTRIBUTE} {selector}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(selectors: &[&str]) -> Vec<String> {
        selectors.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn root_selector_takes_the_attribute_itself() {
        let policy = SelectorPolicy::default();
        assert_eq!(
            policy.filter(&owned(&[":root"])),
            vec![":root[dark-theme=\"true\"]"]
        );
    }

    #[test]
    fn other_selectors_are_scoped_as_descendants() {
        let policy = SelectorPolicy::default();
        assert_eq!(
            policy.filter(&owned(&[".foo .bar"])),
            vec!["[dark-theme=\"true\"] .foo .bar"]
        );
    }

    #[test]
    fn prefix_patterns_drop_matching_selectors() {
        let policy = SelectorPolicy::default();
        assert!(policy.filter(&owned(&[".sw-admin-menu__item"])).is_empty());
        assert!(policy.filter(&owned(&[".sw-tooltip--wide"])).is_empty());
    }

    #[test]
    fn exact_patterns_do_not_match_extensions() {
        let policy = SelectorPolicy::default();
        assert!(policy.filter(&owned(&[".sw-modal"])).is_empty());
        assert_eq!(
            policy.filter(&owned(&[".sw-modal__dialog"])),
            vec!["[dark-theme=\"true\"] .sw-modal__dialog"]
        );
    }

    #[test]
    fn selector_granularity_keeps_mixed_blocks() {
        let policy = SelectorPolicy::default();
        let result = policy.filter(&owned(&[".sw-version", ".sw-button"]));
        assert_eq!(result, vec!["[dark-theme=\"true\"] .sw-button"]);
    }

    #[test]
    fn block_granularity_skips_mixed_blocks() {
        let policy = SelectorPolicy::new(Config::default().ignore, Granularity::Block);
        assert!(policy
            .filter(&owned(&[".sw-version", ".sw-button"]))
            .is_empty());
    }

    #[test]
    fn selector_order_is_preserved() {
        let policy = SelectorPolicy::default();
        let result = policy.filter(&owned(&[".b", ".a"]));
        assert_eq!(
            result,
            vec!["[dark-theme=\"true\"] .b", "[dark-theme=\"true\"] .a"]
        );
    }
}
