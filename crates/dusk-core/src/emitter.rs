use crate::ast::{DeclarationBlock, Document, Node, Rule};
use crate::value::{Color, Function, List, Separator, Size, Value};

/// Serialize a document compactly: no indentation, no newlines, no comments.
/// Re-parsing the output reproduces a structurally equal document.
pub fn emit(document: &Document) -> String {
    let mut out = String::new();

    for node in &document.nodes {
        match node {
            Node::Block(block) => emit_block(block, &mut out),
            Node::Other(raw) => out.push_str(raw),
        }
    }
    out
}

fn emit_block(block: &DeclarationBlock, out: &mut String) {
    for (i, selector) in block.selectors.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(selector);
    }
    out.push('{');
    for (i, rule) in block.rules.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        emit_rule(rule, out);
    }
    out.push('}');
}

fn emit_rule(rule: &Rule, out: &mut String) {
    out.push_str(&rule.property);
    out.push(':');
    emit_value(&rule.value, out);
    if rule.important {
        out.push_str(" !important");
    }
}

pub fn emit_value(value: &Value, out: &mut String) {
    match value {
        Value::Color(color) => out.push_str(&color_literal(color)),
        Value::Size(size) => emit_size(size, out),
        Value::Keyword(keyword) => out.push_str(keyword),
        Value::List(list) => emit_list(list, out),
        Value::Function(function) => emit_function(function, out),
    }
}

/// Normalized spelling of a color: opaque RGB as `#rrggbb`, alpha-bearing RGB
/// as `rgba()`, HSL kept functional. Also the lookup key for palette mode.
pub fn color_literal(color: &Color) -> String {
    match color {
        Color::Rgb {
            r,
            g,
            b,
            alpha: None,
        } => format!("#{:02x}{:02x}{:02x}", channel(*r), channel(*g), channel(*b)),
        Color::Rgb {
            r,
            g,
            b,
            alpha: Some(a),
        } => format!(
            "rgba({},{},{},{})",
            channel(*r),
            channel(*g),
            channel(*b),
            number(*a)
        ),
        Color::Hsl {
            h,
            s,
            l,
            alpha: None,
        } => format!("hsl({},{}%,{}%)", number(*h), number(*s), number(*l)),
        Color::Hsl {
            h,
            s,
            l,
            alpha: Some(a),
        } => format!(
            "hsla({},{}%,{}%,{})",
            number(*h),
            number(*s),
            number(*l),
            number(*a)
        ),
    }
}

fn emit_size(size: &Size, out: &mut String) {
    out.push_str(&number(size.magnitude));
    if let Some(unit) = &size.unit {
        out.push_str(unit);
    }
}

fn emit_list(list: &List, out: &mut String) {
    for (i, item) in list.items.iter().enumerate() {
        if i > 0 {
            out.push(match list.sep {
                Separator::Space => ' ',
                Separator::Comma => ',',
            });
        }
        emit_value(item, out);
    }
}

fn emit_function(function: &Function, out: &mut String) {
    out.push_str(&function.name);
    out.push('(');
    for (i, arg) in function.args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_value(arg, out);
    }
    out.push(')');
}

fn channel(c: f64) -> u8 {
    c.round().clamp(0.0, 255.0) as u8
}

fn number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Document;
    use crate::parser;
    use crate::value::Color;

    #[test]
    fn opaque_rgb_prints_as_hex() {
        assert_eq!(color_literal(&Color::rgb(29.0, 38.0, 50.0)), "#1d2632");
    }

    #[test]
    fn alpha_rgb_prints_functional() {
        let color = Color::Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            alpha: Some(0.3),
        };
        assert_eq!(color_literal(&color), "rgba(0,0,0,0.3)");
    }

    #[test]
    fn hsl_keeps_fractional_lightness() {
        assert_eq!(color_literal(&Color::hsl(214.0, 27.0, 86.5)), "hsl(214,27%,86.5%)");
    }

    #[test]
    fn compact_block_format() {
        let doc = parser::parse(".a, .b {\n  color: #ffffff;\n  margin: 10px !important;\n}")
            .unwrap();
        assert_eq!(emit(&doc), ".a,.b{color:#ffffff;margin:10px !important}");
    }

    fn roundtrip(source: &str) -> (Document, Document) {
        let first = parser::parse(source).unwrap();
        let emitted = emit(&first);
        let second = parser::parse(&emitted).unwrap();
        (first, second)
    }

    #[test]
    fn emitted_text_reparses_equal() {
        let sources = [
            ".a{color:#1d2632}",
            ".a{background:#fff url(x.png) no-repeat}",
            ".a{background:linear-gradient(to right,#fff,rgba(0,0,0,0.3))}",
            ".a{box-shadow:0 1px 2px rgba(0,0,0,0.5)}",
            ".a{color:hsl(214,27%,86.5%)}",
            ".a,.b{margin:10px;color:#abc}",
        ];
        for source in sources {
            let (first, second) = roundtrip(source);
            assert_eq!(first, second, "round-trip diverged for {source}");
        }
    }
}
