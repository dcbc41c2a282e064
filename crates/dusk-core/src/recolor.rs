//! The value-tree recolorer: replaces every reachable color in a declaration
//! value with its dark-theme counterpart, reporting whether any was found.

use crate::ast::Rule;
use crate::color;
use crate::config::Palette;
use crate::emitter;
use crate::error::{Error, Result, Span};
use crate::value::{Color, Function, List, Value};

/// Derive the dark-mode counterpart of one rule.
///
/// Returns `None` when the value holds no transformable color: such rules
/// are redundant in the derived block, which applies additively on top of
/// the base rule.
pub fn recolor_rule(rule: &Rule, palette: Option<&Palette>) -> Result<Option<Rule>> {
    let (value, found) = recolor_value(&rule.value, &rule.property, rule.span, palette)?;
    if !found {
        return Ok(None);
    }

    let mut derived = Rule {
        property: rule.property.clone(),
        value,
        important: rule.important,
        span: rule.span,
    };
    collapse_shorthand(&mut derived);
    Ok(Some(derived))
}

/// Walk a value, building a new tree with every reachable color replaced.
/// The flag is true iff at least one color in the subtree was transformed.
pub fn recolor_value(
    value: &Value,
    property: &str,
    span: Span,
    palette: Option<&Palette>,
) -> Result<(Value, bool)> {
    match value {
        Value::Color(color) => {
            let transformed = transform_color(color, property, span, palette)?;
            Ok((Value::Color(transformed), true))
        }
        Value::List(list) => {
            let mut found = false;
            let mut items = Vec::with_capacity(list.items.len());
            for item in &list.items {
                let (item, item_found) = recolor_value(item, property, span, palette)?;
                found |= item_found;
                items.push(item);
            }
            Ok((
                Value::List(List {
                    items,
                    sep: list.sep,
                }),
                found,
            ))
        }
        Value::Function(function) => {
            let mut found = false;
            let mut args = Vec::with_capacity(function.args.len());
            for arg in &function.args {
                let (arg, arg_found) = recolor_value(arg, property, span, palette)?;
                found |= arg_found;
                args.push(arg);
            }
            Ok((
                Value::Function(Function {
                    name: function.name.clone(),
                    args,
                }),
                found,
            ))
        }
        Value::Size(_) | Value::Keyword(_) => Ok((value.clone(), false)),
    }
}

fn transform_color(
    color: &Color,
    property: &str,
    span: Span,
    palette: Option<&Palette>,
) -> Result<Color> {
    // Shadows keep their geometry from the base rule; the derived color is
    // always near-black regardless of the input space.
    if property == "box-shadow" {
        return Ok(Color::Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            alpha: color.alpha(),
        });
    }

    if let Some(palette) = palette {
        return palette
            .lookup(color)
            .cloned()
            .ok_or_else(|| Error::UnmappedColor {
                literal: emitter::color_literal(color),
                span,
            });
    }

    Ok(match color {
        Color::Rgb { r, g, b, alpha } => {
            let (h, s, l) = color::rgb_to_hsl(*r, *g, *b);
            let (h, s, l) = color::darken(h, s, l);
            let (r, g, b) = color::hsl_to_rgb(h, s, l);
            Color::Rgb {
                r: r.round(),
                g: g.round(),
                b: b.round(),
                alpha: *alpha,
            }
        }
        Color::Hsl { h, s, l, alpha } => {
            let (h, s, l) = color::darken(*h, *s, *l);
            Color::Hsl { h, s, l, alpha: *alpha }
        }
    })
}

/// Collapse a `background`/`border` shorthand whose recolored list carries
/// exactly one direct color into the color-only longhand. The non-color
/// siblings stay covered by the base rule.
fn collapse_shorthand(rule: &mut Rule) {
    let longhand = match rule.property.as_str() {
        "background" => "background-color",
        "border" => "border-color",
        _ => return,
    };

    let single = {
        let Value::List(list) = &rule.value else {
            return;
        };
        let mut colors = list
            .items
            .iter()
            .filter(|item| matches!(item, Value::Color(_)));
        match (colors.next(), colors.next()) {
            (Some(color), None) => color.clone(),
            _ => return,
        }
    };

    rule.value = single;
    rule.property = longhand.to_string();
}
