//! Inline Stylesheet Parser
//!
//! Splits stylesheet text into flat selector rules. Declaration blocks are
//! handed to a caller-supplied parser so the host decides how values are
//! typed; [`parse_declarations`] is the default.

use std::convert::Infallible;

use smallvec::SmallVec;

use crate::error::{CssError, CssResult, SourceLocation};
use crate::selector::{classify_selector_at, SelectorKind};
use crate::value::StyleRecord;

/// One selector of a rule paired with its declarations
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorRule {
    pub kind: SelectorKind,
    /// Selector name without `.` / `#`
    pub key: String,
    /// Pseudo state, `base` when absent
    pub pseudo: String,
    pub declarations: StyleRecord,
}

impl SelectorRule {
    pub fn new(
        kind: SelectorKind,
        key: impl Into<String>,
        pseudo: impl Into<String>,
        declarations: StyleRecord,
    ) -> Self {
        Self { kind, key: key.into(), pseudo: pseudo.into(), declarations }
    }
}

/// Parse stylesheet text, delegating each declaration block to `parse_block`.
///
/// A selector list produces one rule per selector, all sharing the same
/// declarations. Malformed selectors and unterminated blocks are skipped
/// with a warning; only errors from `parse_block` are returned.
pub fn parse_inline_css<F, E>(text: &str, mut parse_block: F) -> Result<Vec<SelectorRule>, E>
where
    F: FnMut(&str) -> Result<StyleRecord, E>,
{
    InlineCssParser::new(text).parse_rules(&mut parse_block)
}

/// Parse stylesheet text with the default declaration parser
pub fn parse_stylesheet(text: &str) -> Vec<SelectorRule> {
    match parse_inline_css(text, |block| Ok::<_, Infallible>(parse_declarations(block))) {
        Ok(rules) => rules,
        Err(never) => match never {},
    }
}

/// Character scanner over stylesheet text
struct InlineCssParser<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

/// Where a prelude scan stopped
enum Prelude {
    /// Selector text before a `{`
    Block(String),
    /// A block-less at-rule ended by `;`
    Statement(String),
}

impl<'a> InlineCssParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1, column: 1 }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.pos)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skip a `/* ... */` comment at the cursor
    fn skip_comment(&mut self) -> bool {
        if !self.rest().starts_with("/*") {
            return false;
        }
        let end = match self.rest()[2..].find("*/") {
            Some(end) => self.pos + end + 4,
            None => self.input.len(),
        };
        while self.pos < end {
            self.bump();
        }
        true
    }

    fn skip_whitespace(&mut self) {
        loop {
            if self.skip_comment() {
                continue;
            }
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    /// Copy a quoted string (opening quote already pushed)
    fn copy_string(&mut self, quote: char, out: &mut String) {
        while let Some(c) = self.bump() {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else if c == quote {
                return;
            }
        }
    }

    /// Collect selector text up to and including `{`, or an at-rule up to `;`
    fn collect_prelude(&mut self) -> CssResult<Prelude> {
        let mut out = String::new();
        loop {
            if self.skip_comment() {
                continue;
            }
            let location = self.location();
            match self.bump() {
                None => return Err(CssError::unexpected_eof(location)),
                Some('{') => return Ok(Prelude::Block(out)),
                Some('}') => return Err(CssError::parse_error("unexpected '}'", location)),
                Some(';') if out.trim_start().starts_with('@') => return Ok(Prelude::Statement(out)),
                Some(quote @ ('"' | '\'')) => {
                    out.push(quote);
                    self.copy_string(quote, &mut out);
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Collect a block body up to its matching `}`
    fn collect_block(&mut self) -> CssResult<String> {
        let mut out = String::new();
        let mut depth = 0usize;
        loop {
            if self.skip_comment() {
                continue;
            }
            match self.bump() {
                None => return Err(CssError::unexpected_eof(self.location())),
                Some('}') if depth == 0 => return Ok(out),
                Some('}') => {
                    depth -= 1;
                    out.push('}');
                }
                Some('{') => {
                    depth += 1;
                    out.push('{');
                }
                Some(quote @ ('"' | '\'')) => {
                    out.push(quote);
                    self.copy_string(quote, &mut out);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_rules<F, E>(&mut self, parse_block: &mut F) -> Result<Vec<SelectorRule>, E>
    where
        F: FnMut(&str) -> Result<StyleRecord, E>,
    {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }

            let location = self.location();
            let prelude = match self.collect_prelude() {
                Ok(Prelude::Block(prelude)) => prelude,
                Ok(Prelude::Statement(statement)) => {
                    log::debug!("skipping at-rule '{}' at {}", statement.trim(), location);
                    continue;
                }
                Err(err @ CssError::UnexpectedEof { .. }) => {
                    log::warn!("ignoring trailing stylesheet text: {}", err);
                    break;
                }
                Err(err) => {
                    log::warn!("{}", err);
                    continue;
                }
            };

            let block = match self.collect_block() {
                Ok(block) => block,
                Err(err) => {
                    log::warn!("unterminated block for '{}': {}", prelude.trim(), err);
                    break;
                }
            };

            let prelude = prelude.trim();
            if prelude.starts_with('@') {
                log::debug!("skipping at-rule '{}' at {}", prelude, location);
                continue;
            }
            if prelude.is_empty() {
                log::warn!("{}", CssError::parse_error("missing selector", location));
                continue;
            }

            let declarations = parse_block(&block)?;

            for selector in split_selector_list(prelude) {
                match classify_selector_at(selector, location) {
                    Ok(classified) => rules.push(SelectorRule {
                        kind: classified.selector.kind(),
                        key: classified.selector.key().to_string(),
                        pseudo: classified.pseudo,
                        declarations: declarations.clone(),
                    }),
                    Err(err) => log::warn!("skipping rule: {}", err),
                }
            }
        }

        log::trace!("parsed {} selector rules", rules.len());
        Ok(rules)
    }
}

/// Split text on `separator` outside quotes, brackets and parentheses
fn split_top_level(text: &str, separator: char) -> SmallVec<[&str; 4]> {
    let mut parts = SmallVec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn split_selector_list(text: &str) -> SmallVec<[&str; 4]> {
    split_top_level(text, ',')
}

/// Convert a kebab-case property name to lowerCamelCase
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.trim_start_matches('-').chars() {
        if c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_important(value: &str) -> &str {
    let trimmed = value.trim_end();
    if let Some(bang) = trimmed.rfind('!') {
        if trimmed[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return trimmed[..bang].trim_end();
        }
    }
    trimmed
}

/// Default declaration parser: `name: value;` pairs become string entries
/// keyed by lowerCamelCase property name. Custom properties keep their name.
pub fn parse_declarations(text: &str) -> StyleRecord {
    let mut record = StyleRecord::new();

    for declaration in split_top_level(text, ';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }

        let Some((name, value)) = declaration.split_once(':') else {
            log::debug!("skipping declaration without ':' '{}'", declaration);
            continue;
        };

        let name = name.trim();
        let value = strip_important(value.trim());
        if name.is_empty() || value.is_empty() {
            log::debug!("skipping empty declaration '{}'", declaration);
            continue;
        }

        let key = if name.starts_with("--") {
            name.to_string()
        } else {
            kebab_to_camel(&name.to_ascii_lowercase())
        };
        record.insert(key, value);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rule() {
        let rules = parse_stylesheet(".card { background-color: red; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].kind, SelectorKind::Class);
        assert_eq!(rules[0].key, "card");
        assert_eq!(rules[0].pseudo, "base");
        assert_eq!(rules[0].declarations.get_str("backgroundColor"), Some("red"));
    }

    #[test]
    fn test_selector_list_shares_declarations() {
        let rules = parse_stylesheet(".a, #b:hover, label { color: blue }");
        assert_eq!(rules.len(), 3);
        assert_eq!((rules[1].kind, rules[1].key.as_str(), rules[1].pseudo.as_str()), (SelectorKind::Id, "b", "hover"));
        assert_eq!(rules[2].kind, SelectorKind::Type);
        assert!(rules.iter().all(|r| r.declarations == rules[0].declarations));
    }

    #[test]
    fn test_comments_and_strings() {
        let css = "/* header */ .a/* x */:hover { font-family: \"A}B\", serif; /* c */ color: red }";
        let rules = parse_stylesheet(css);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pseudo, "hover");
        assert_eq!(rules[0].declarations.get_str("fontFamily"), Some("\"A}B\", serif"));
        assert_eq!(rules[0].declarations.get_str("color"), Some("red"));
    }

    #[test]
    fn test_malformed_selector_skipped() {
        let rules = parse_stylesheet(".a .b { color: red } .ok { color: blue }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].key, "ok");
    }

    #[test]
    fn test_unterminated_block() {
        let rules = parse_stylesheet(".a { color: red } .b { color: blue");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].key, "a");
    }

    #[test]
    fn test_at_rule_skipped() {
        let rules = parse_stylesheet("@media (min-width: 10px) { .x { color: red } } .y { color: blue }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].key, "y");
    }

    #[test]
    fn test_blockless_at_rule_keeps_next_rule() {
        let rules = parse_stylesheet("@import \"a;b.css\"; @charset 'utf-8'; .y { color: blue }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].key, "y");
        assert_eq!(rules[0].declarations.get_str("color"), Some("blue"));
    }

    #[test]
    fn test_location_tracks_lines_and_comments() {
        let input = "/* c\n */\n  .a";
        let mut parser = InlineCssParser::new(input);
        parser.skip_whitespace();
        assert_eq!(parser.location(), SourceLocation::new(3, 3, 11));
        assert_eq!(parser.location(), SourceLocation::from_offset(input, 11));
    }

    #[test]
    fn test_large_stylesheet() {
        let css: String = (0..4000)
            .map(|i| format!(".cls-{i}:hover, #id-{i} {{ color: red; margin: {i}px }}\n"))
            .collect();

        let start = std::time::Instant::now();
        let rules = parse_stylesheet(&css);
        let elapsed = start.elapsed();

        assert_eq!(rules.len(), 8000);
        assert_eq!(rules[7999].key, "id-3999");
        assert_eq!(rules[7999].declarations.get_str("margin"), Some("3999px"));
        assert!(elapsed < std::time::Duration::from_secs(5), "parsing took {:?}", elapsed);
    }

    #[test]
    fn test_stray_brace() {
        let rules = parse_stylesheet("} .y { color: blue }");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_declaration_parser_error_propagates() {
        let result: Result<Vec<SelectorRule>, String> =
            parse_inline_css(".a { x }", |block| Err(format!("bad block '{}'", block.trim())));
        assert_eq!(result.unwrap_err(), "bad block 'x'");
    }

    #[test]
    fn test_custom_declaration_parser() {
        let rules: Result<_, Infallible> = parse_inline_css("#root { anything }", |_| {
            Ok(StyleRecord::new().with("opacity", 0.5))
        });
        let rules = rules.unwrap();
        assert_eq!(rules[0].declarations.get("opacity").and_then(|v| v.as_number()), Some(0.5));
    }

    #[test]
    fn test_parse_declarations() {
        let record = parse_declarations(
            "margin-top: 4px; -unity-font-style: bold; color: red !important; --accent: #fff; \
             background-image: url(data:image/png;base64,AAA); broken; : x",
        );
        assert_eq!(record.get_str("marginTop"), Some("4px"));
        assert_eq!(record.get_str("unityFontStyle"), Some("bold"));
        assert_eq!(record.get_str("color"), Some("red"));
        assert_eq!(record.get_str("--accent"), Some("#fff"));
        assert_eq!(record.get_str("backgroundImage"), Some("url(data:image/png;base64,AAA)"));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_kebab_to_camel() {
        assert_eq!(kebab_to_camel("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(kebab_to_camel("color"), "color");
        assert_eq!(kebab_to_camel("-webkit-transform"), "webkitTransform");
    }
}
