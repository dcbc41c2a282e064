use crate::ast::{DeclarationBlock, Document, Node};
use crate::config::{Config, Palette};
use crate::emitter;
use crate::error::Result;
use crate::parser;
use crate::policy::SelectorPolicy;
use crate::recolor;

/// Boundary between authored source and generated output. Everything after
/// the marker is regenerated on the next pass, so recompiling a compiled
/// file never feeds generated rules back into the generator.
pub const MARKER: &str = "/* DneAdminDarkMode START */";

/// A configured compilation pipeline: selector policy plus optional strict
/// palette, reusable across files.
#[derive(Debug)]
pub struct Compiler {
    policy: SelectorPolicy,
    palette: Option<Palette>,
}

impl Compiler {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            policy: SelectorPolicy::from_config(config),
            palette: config.palette()?,
        })
    }

    /// Compile one stylesheet text.
    ///
    /// Returns the full text to persist (authored source, marker, derived
    /// rules), or `None` when nothing needs to be written: either the source
    /// carries no color literal at all, or no rule survived the policy and
    /// the recolorer. Callers must leave the file untouched on `None` so the
    /// marker is never duplicated.
    pub fn compile(&self, source: &str) -> Result<Option<String>> {
        let pre_marker = source.split(MARKER).next().unwrap_or(source);

        if !contains_color_literal(pre_marker) {
            log::debug!("no color literals found, skipping compilation");
            return Ok(None);
        }

        let document = parser::parse(pre_marker)?;
        let derived = self.derive_document(&document)?;
        if derived.is_empty() {
            log::debug!("derived document is empty, skipping write");
            return Ok(None);
        }

        let mut out = String::with_capacity(pre_marker.len() * 2);
        out.push_str(pre_marker);
        out.push_str(MARKER);
        out.push_str(&emitter::emit(&derived));
        Ok(Some(out))
    }

    /// Assemble the derived document: selector policy first (cheap
    /// short-circuit), then the recolorer over every rule, dropping blocks
    /// that end up empty. Relative block order is preserved.
    pub fn derive_document(&self, document: &Document) -> Result<Document> {
        let mut nodes = Vec::new();

        for block in document.blocks() {
            let selectors = self.policy.filter(&block.selectors);
            if selectors.is_empty() {
                log::debug!("all selectors ignored for {:?}", block.selectors);
                continue;
            }

            let mut rules = Vec::new();
            for rule in &block.rules {
                if let Some(derived) = recolor::recolor_rule(rule, self.palette.as_ref())? {
                    rules.push(derived);
                }
            }
            if rules.is_empty() {
                continue;
            }

            nodes.push(Node::Block(DeclarationBlock { selectors, rules }));
        }

        Ok(Document { nodes })
    }
}

/// Cheap pre-filter: parsing is the expensive step and most files carry no
/// color literal at all. Matches hex triplets/sextets on a word boundary and
/// the functional notations.
pub fn contains_color_literal(css: &str) -> bool {
    let bytes = css.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' {
            let run = bytes[i + 1..]
                .iter()
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            if run == 3 || run == 6 {
                let next = bytes.get(i + 1 + run);
                if !next.is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'_') {
                    return true;
                }
            }
        }
    }

    ["rgb(", "rgba(", "hsl(", "hsla("]
        .iter()
        .any(|needle| css.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn compiler() -> Compiler {
        Compiler::new(&Config::default()).unwrap()
    }

    #[test]
    fn prefilter_accepts_color_notations() {
        assert!(contains_color_literal("a{color:#fff}"));
        assert!(contains_color_literal("a{color:#1d2632}"));
        assert!(contains_color_literal("a{color:rgb(1,2,3)}"));
        assert!(contains_color_literal("a{color:rgba(1,2,3,.5)}"));
        assert!(contains_color_literal("a{color:hsl(1,2%,3%)}"));
        assert!(contains_color_literal("a{color:hsla(1,2%,3%,.5)}"));
    }

    #[test]
    fn prefilter_rejects_non_colors() {
        assert!(!contains_color_literal("a{margin:10px}"));
        assert!(!contains_color_literal("a{content:\"#12\"}"));
        assert!(!contains_color_literal("a{color:#12345}"));
        assert!(!contains_color_literal(".x #abcdefgh{margin:0}"));
    }

    #[test]
    fn sources_without_colors_are_skipped_without_parsing() {
        // An unterminated block would fail the parser, so a None result
        // proves the pre-filter short-circuited.
        let result = compiler().compile("a { margin: 10px;").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn end_to_end_derivation() {
        let source = ".sw-button { background-color: #1d2632; }";
        let compiled = compiler().compile(source).unwrap().unwrap();
        assert_eq!(
            compiled,
            format!(
                "{source}{MARKER}[dark-theme=\"true\"] .sw-button{{background-color:#d3dbe6}}"
            )
        );
    }

    #[test]
    fn recompilation_is_idempotent() {
        let source = ":root { --x: 1; }\n.sw-button { background-color: #1d2632; }\n";
        let first = compiler().compile(source).unwrap().unwrap();
        let second = compiler().compile(&first).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(second.matches(MARKER).count(), 1);
        assert!(second.starts_with(source));
    }

    #[test]
    fn ignored_blocks_produce_no_output() {
        let source = ".sw-admin-menu { background: #fff; }";
        assert!(compiler().compile(source).unwrap().is_none());
    }

    #[test]
    fn colorless_blocks_produce_no_output() {
        let source = ".a { margin: 10px; }\n.b { color: inherit; }";
        assert!(compiler().compile(source).unwrap().is_none());
    }

    #[test]
    fn at_rules_are_not_transformed() {
        let source = "@media screen { .a { color: #fff; } }\n.b { color: #000; }";
        let compiled = compiler().compile(source).unwrap().unwrap();
        let derived = &compiled[source.len() + MARKER.len()..];
        assert!(!derived.contains("@media"));
        assert!(derived.contains("[dark-theme=\"true\"] .b{color:#ffffff}"));
    }

    #[test]
    fn block_order_is_preserved() {
        let source = ".a { color: #000; }\n.b { color: #000; }";
        let compiled = compiler().compile(source).unwrap().unwrap();
        let derived = &compiled[source.len() + MARKER.len()..];
        assert_eq!(
            derived,
            "[dark-theme=\"true\"] .a{color:#ffffff}[dark-theme=\"true\"] .b{color:#ffffff}"
        );
    }

    #[test]
    fn mixed_blocks_keep_only_color_rules() {
        let source = ".a { margin: 4px; color: #000; padding: 2px; }";
        let compiled = compiler().compile(source).unwrap().unwrap();
        let derived = &compiled[source.len() + MARKER.len()..];
        assert_eq!(derived, "[dark-theme=\"true\"] .a{color:#ffffff}");
    }

    #[test]
    fn strict_palette_violations_propagate() {
        let config: Config =
            serde_json::from_str(r##"{ "palette": { "#000000": "#ffffff" } }"##).unwrap();
        let compiler = Compiler::new(&config).unwrap();

        let ok = compiler.compile(".a { color: #000; }").unwrap().unwrap();
        assert!(ok.contains("color:#ffffff"));

        let err = compiler.compile(".a { color: #123456; }").unwrap_err();
        assert!(matches!(err, Error::UnmappedColor { .. }));
    }

    #[test]
    fn root_selector_is_rewritten_in_place() {
        let source = ":root { --accent: #1d2632; }";
        let compiled = compiler().compile(source).unwrap().unwrap();
        assert!(compiled.contains(":root[dark-theme=\"true\"]{--accent:#d3dbe6}"));
    }
}
