use crate::ast::{DeclarationBlock, Document, Node, Rule};
use crate::error::{Error, Result, Span};
use crate::value::{Color, Function, List, Separator, Size, Value};

/// Parse one stylesheet text into a [`Document`].
///
/// The grammar covers what the recolorer can act on: declaration blocks with
/// hex / `rgb()` / `rgba()` / `hsl()` / `hsla()` colors, sizes with units,
/// keywords, nested functions, and comma/space lists. At-rules are captured
/// verbatim as opaque nodes; comments are discarded.
pub fn parse(input: &str) -> Result<Document> {
    let cleaned = blank_comments(input);
    let index = LineIndex::new(input);
    let bytes = cleaned.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut nodes = Vec::new();

    while pos < len {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        if bytes[pos] == b'@' {
            let (raw, next) = collect_at_rule(&cleaned, pos, &index)?;
            nodes.push(Node::Other(raw));
            pos = next;
            continue;
        }

        let open_idx = match cleaned[pos..].find('{') {
            Some(rel) => pos + rel,
            None => {
                return Err(Error::parse(
                    "expected '{' after selector",
                    index.span(pos),
                ))
            }
        };
        let selector_text = cleaned[pos..open_idx].trim();
        if selector_text.is_empty() {
            return Err(Error::parse("missing selector before '{'", index.span(pos)));
        }

        let body_start = open_idx + 1;
        let body_end = find_matching_brace(&cleaned, body_start)
            .ok_or_else(|| Error::parse("unterminated block", index.span(open_idx)))?;

        let selectors = split_top_level(selector_text, ',')
            .into_iter()
            .map(|(s, _)| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let rules = parse_declarations(&cleaned[body_start..body_end], body_start, &index)?;

        nodes.push(Node::Block(DeclarationBlock { selectors, rules }));
        pos = body_end + 1;
    }

    Ok(Document { nodes })
}

/// Parse the declarations of one block body.
fn parse_declarations(body: &str, body_offset: usize, index: &LineIndex) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();

    for (fragment, offset) in split_top_level(body, ';') {
        let decl = fragment.trim();
        if decl.is_empty() {
            continue;
        }

        let span = index.span(body_offset + offset + leading_whitespace(fragment));
        let (property, value_text) = decl
            .split_once(':')
            .ok_or_else(|| Error::parse(format!("invalid declaration '{decl}'"), span))?;

        let mut value_text = value_text.trim();
        let mut important = false;
        if let Some(stripped) = strip_important(value_text) {
            value_text = stripped;
            important = true;
        }

        rules.push(Rule {
            property: property.trim().to_string(),
            value: parse_value(value_text),
            important,
            span,
        });
    }

    Ok(rules)
}

/// Parse one declaration value. Never fails: anything outside the supported
/// grammar is kept verbatim as a keyword.
pub fn parse_value(text: &str) -> Value {
    let groups = split_top_level(text, ',');
    if groups.len() > 1 {
        let items = groups
            .into_iter()
            .map(|(group, _)| parse_group(group.trim()))
            .collect();
        return Value::List(List {
            items,
            sep: Separator::Comma,
        });
    }
    parse_group(text.trim())
}

fn parse_group(text: &str) -> Value {
    let tokens = split_tokens(text);
    if tokens.len() == 1 {
        return parse_token(tokens[0]);
    }
    Value::List(List {
        items: tokens.into_iter().map(parse_token).collect(),
        sep: Separator::Space,
    })
}

fn parse_token(token: &str) -> Value {
    if let Some(hex) = token.strip_prefix('#') {
        if let Some(color) = parse_hex_color(hex) {
            return Value::Color(color);
        }
        return Value::Keyword(token.to_string());
    }

    if let Some((name, inner)) = split_function(token) {
        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "rgb" | "rgba" | "hsl" | "hsla" => {
                if let Some(color) = parse_functional_color(&lowered, inner) {
                    return Value::Color(color);
                }
            }
            // url contents are not CSS values; keep the whole token opaque.
            "url" => return Value::Keyword(token.to_string()),
            _ => {}
        }
        let args = split_top_level(inner, ',')
            .into_iter()
            .map(|(arg, _)| parse_group(arg.trim()))
            .collect();
        return Value::Function(Function {
            name: name.to_string(),
            args,
        });
    }

    if let Some(size) = parse_size(token) {
        return Value::Size(size);
    }

    Value::Keyword(token.to_string())
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let (r, g, b) = match hex.len() {
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        3 => (
            u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?,
            u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?,
            u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?,
        ),
        _ => return None,
    };
    Some(Color::rgb(f64::from(r), f64::from(g), f64::from(b)))
}

/// Reduce `rgb(...)`/`hsl(...)` arguments to numeric components. Anything
/// else (`var()` indirection, percent-typed rgb channels) is left to the
/// function fallback and passes through untransformed.
fn parse_functional_color(name: &str, inner: &str) -> Option<Color> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let with_alpha = name.ends_with('a');
    if parts.len() != if with_alpha { 4 } else { 3 } {
        return None;
    }

    let alpha = if with_alpha {
        Some(parts[3].parse::<f64>().ok()?)
    } else {
        None
    };

    match name {
        "rgb" | "rgba" => {
            let r = parts[0].parse::<f64>().ok()?;
            let g = parts[1].parse::<f64>().ok()?;
            let b = parts[2].parse::<f64>().ok()?;
            Some(Color::Rgb { r, g, b, alpha })
        }
        _ => {
            let h = parts[0].parse::<f64>().ok()?;
            let s = parts[1].strip_suffix('%').unwrap_or(parts[1]).parse().ok()?;
            let l = parts[2].strip_suffix('%').unwrap_or(parts[2]).parse().ok()?;
            Some(Color::Hsl { h, s, l, alpha })
        }
    }
}

fn parse_size(token: &str) -> Option<Size> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+')
        .unwrap_or(token.len());
    let magnitude: f64 = token[..digits_end].parse().ok()?;
    let unit = &token[digits_end..];
    if unit.is_empty() {
        return Some(Size::new(magnitude, None));
    }
    if unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(Size::new(magnitude, Some(unit)));
    }
    None
}

fn split_function(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    if !token.ends_with(')') || open == 0 {
        return None;
    }
    let name = &token[..open];
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some((name, &token[open + 1..token.len() - 1]))
}

fn strip_important(value: &str) -> Option<&str> {
    let trimmed = value.trim_end();
    let bang = trimmed.rfind('!')?;
    if trimmed[bang + 1..].trim().eq_ignore_ascii_case("important") {
        Some(trimmed[..bang].trim_end())
    } else {
        None
    }
}

/// Split on `sep` outside parentheses and quotes. Returns each piece with its
/// byte offset into the input.
fn split_top_level(text: &str, sep: char) -> Vec<(&str, usize)> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    pieces.push((&text[start..i], start));
                    start = i + ch.len_utf8();
                }
                _ => {}
            },
        }
    }
    pieces.push((&text[start..], start));
    pieces
}

/// Split a group into whitespace-separated tokens, keeping parenthesized and
/// quoted runs intact.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        let boundary = quote.is_none() && depth == 0 && ch.is_whitespace();
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }

        if boundary {
            if let Some(s) = start.take() {
                tokens.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// Capture an at-rule verbatim: up to `;` for statement forms, through the
/// matching `}` for block forms.
fn collect_at_rule(text: &str, start: usize, index: &LineIndex) -> Result<(String, usize)> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return Ok((text[start..=i].to_string(), i + 1)),
            b'{' => {
                let end = find_matching_brace(text, i + 1)
                    .ok_or_else(|| Error::parse("unterminated at-rule", index.span(start)))?;
                return Ok((text[start..=end].to_string(), end + 1));
            }
            _ => i += 1,
        }
    }
    Err(Error::parse("unterminated at-rule", index.span(start)))
}

/// Index of the `}` matching the block opened just before `from`.
fn find_matching_brace(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (i, ch) in text[from..].char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(from + i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Replace every comment with spaces of the same byte length, preserving
/// newlines so spans keep pointing at source positions.
fn blank_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < input.len() {
        let Some(ch) = input[i..].chars().next() else {
            break;
        };

        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            out.push(ch);
            i += ch.len_utf8();
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                out.push(ch);
                i += 1;
            }
            '/' if input[i + 1..].starts_with('*') => {
                let end = input[i + 2..]
                    .find("*/")
                    .map_or(input.len(), |rel| i + 2 + rel + 2);
                for &b in &input.as_bytes()[i..end] {
                    out.push(if b == b'\n' { '\n' } else { ' ' });
                }
                i = end;
            }
            _ => {
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    out
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in input.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn span(&self, offset: usize) -> Span {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Span {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}
