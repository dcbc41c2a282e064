use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::emitter;
use crate::error::{Error, Result};
use crate::parser;
use crate::value::{Color, Value};

/// Generator configuration, loadable from a JSON file.
///
/// The ignore list and the filtering granularity feed the selector policy;
/// the optional palette switches the recolorer from computed darkening to an
/// exhaustive literal-to-literal lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ignore: Vec<IgnorePattern>,
    pub granularity: Granularity,
    pub palette: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IgnorePattern {
    pub matcher: Matcher,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matcher {
    Prefix,
    Exact,
}

/// How the ignore list is applied to a block's selector list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Skip the whole block when any selector matches.
    Block,
    /// Filter selectors independently; the block survives while one remains.
    #[default]
    Selector,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: default_ignore_list(),
            granularity: Granularity::default(),
            palette: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the raw palette table into normalized color lookups.
    pub fn palette(&self) -> Result<Option<Palette>> {
        let Some(raw) = &self.palette else {
            return Ok(None);
        };

        let mut map = HashMap::new();
        for (from, to) in raw {
            let key = parse_palette_color(from)?;
            let replacement = parse_palette_color(to)?;
            map.insert(emitter::color_literal(&key), replacement);
        }
        Ok(Some(Palette { map }))
    }
}

impl IgnorePattern {
    pub fn prefix(pattern: &str) -> Self {
        Self {
            matcher: Matcher::Prefix,
            pattern: pattern.to_string(),
        }
    }

    pub fn exact(pattern: &str) -> Self {
        Self {
            matcher: Matcher::Exact,
            pattern: pattern.to_string(),
        }
    }

    pub fn matches(&self, selector: &str) -> bool {
        match self.matcher {
            Matcher::Prefix => selector.starts_with(&self.pattern),
            Matcher::Exact => selector == self.pattern,
        }
    }
}

/// Curated literal-to-literal color mapping for strict deployments.
#[derive(Debug, Clone)]
pub struct Palette {
    map: HashMap<String, Color>,
}

impl Palette {
    pub fn lookup(&self, color: &Color) -> Option<&Color> {
        self.map.get(&emitter::color_literal(color))
    }
}

fn parse_palette_color(literal: &str) -> Result<Color> {
    match parser::parse_value(literal.trim()) {
        Value::Color(color) => Ok(color),
        _ => Err(Error::Config(format!(
            "palette entry '{literal}' is not a color literal"
        ))),
    }
}

/// Administrative chrome that must never be recolored.
fn default_ignore_list() -> Vec<IgnorePattern> {
    vec![
        IgnorePattern::prefix(".sw-admin-menu"),
        IgnorePattern::prefix(".sw-sales-channel-menu"),
        IgnorePattern::prefix(".sw-version"),
        IgnorePattern::prefix(".sw-alert--system"),
        IgnorePattern::prefix(".sw-tooltip"),
        IgnorePattern::prefix(".sw-arrow-field"),
        IgnorePattern::exact(".sw-modal"),
        IgnorePattern::exact(".sw-data-grid.is--scroll-x .sw-data-grid__cell--selection:before"),
        IgnorePattern::exact(".sw-data-grid.is--scroll-x .sw-data-grid__cell--actions:before"),
        IgnorePattern::exact(".sw-login .sw-login__image-headlines"),
        IgnorePattern::exact(".sw-login .sw-login__badge svg"),
        IgnorePattern::exact(".sw-cms-list-item .sw-cms-list-item__image"),
        IgnorePattern::exact(".sw-cms-list-item .sw-cms-list-item__is-default"),
        IgnorePattern::exact(
            ".sw-cms-create-wizard__step-3 .sw-cms-create-wizard__page-preview \
             .sw-cms-create-wizard__preview_image",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_filters_at_selector_level() {
        let config = Config::default();
        assert_eq!(config.granularity, Granularity::Selector);
        assert!(config.palette.is_none());
        assert!(!config.ignore.is_empty());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "granularity": "block",
                "ignore": [{ "matcher": "prefix", "pattern": ".nav" }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.granularity, Granularity::Block);
        assert_eq!(config.ignore.len(), 1);
        assert!(config.ignore[0].matches(".nav-item"));
        assert!(!config.ignore[0].matches(".footer"));
    }

    #[test]
    fn palette_keys_are_normalized() {
        let config: Config = serde_json::from_str(
            r##"{ "palette": { "#ABC": "#112233" } }"##,
        )
        .unwrap();
        let palette = config.palette().unwrap().unwrap();
        let color = Color::rgb(170.0, 187.0, 204.0);
        assert_eq!(palette.lookup(&color), Some(&Color::rgb(17.0, 34.0, 51.0)));
    }

    #[test]
    fn non_color_palette_entry_is_rejected() {
        let config: Config =
            serde_json::from_str(r##"{ "palette": { "#fff": "inherit" } }"##).unwrap();
        assert!(matches!(config.palette(), Err(Error::Config(_))));
    }
}
