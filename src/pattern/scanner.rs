//! Scanner: splits program text into string runs and special characters.
//!
//! A token boundary falls on both sides of every special character, so the
//! raw stream alternates between maximal runs of ordinary characters and
//! single specials. A handful of fix-up passes then resolve escapes and
//! character ranges before the parser sees the tokens.

use phf::{Set, phf_set};

use crate::error::{Error, SyntaxError};

/// Characters that always form a token of their own.
static SPECIAL_CHARS: Set<char> = phf_set! {
    ':', '+', '*', '?', '~', '%', '<', '>', '(', ')', '[', ']', '{', '}',
    '!', '.', '$', '-', '^', '\n', '\\', '`',
};

pub fn is_special_char(ch: char) -> bool {
    SPECIAL_CHARS.contains(&ch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of literal characters.
    String,
    /// A single special character.
    Special,
    /// A backslash. Only present before escape resolution.
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub col: usize,
}

impl Token {
    fn new(text: String, kind: TokenKind, line: usize, col: usize) -> Self {
        Self {
            text,
            kind,
            line,
            col,
        }
    }

    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::String
    }

    /// True if this is the special token `ch`.
    pub fn is_special(&self, ch: char) -> bool {
        self.kind == TokenKind::Special && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
    }

    pub fn is_newline(&self) -> bool {
        self.is_special('\n')
    }
}

/// Scan `code` into tokens.
///
/// The returned stream always ends with a newline token. Scan errors are all
/// collected before returning.
pub fn scan(code: &str) -> Result<Vec<Token>, Vec<Error>> {
    let mut errors = Vec::new();
    let (mut tokens, end) = split_tokens(code);
    collapse_blank_lines(&mut tokens);
    resolve_escapes(&mut tokens, &mut errors);
    resolve_ranges(&mut tokens, &mut errors);
    merge_strings(&mut tokens);

    if !tokens.last().is_some_and(Token::is_newline) {
        tokens.push(Token::new("\n".into(), TokenKind::Special, end.0, end.1));
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Cut the raw token stream. Also returns the (line, col) just past the end
/// of the code.
fn split_tokens(code: &str) -> (Vec<Token>, (usize, usize)) {
    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::new();

    let mut line = 1;
    let mut col = 0;
    let mut token_line = 1;
    let mut token_col = 1;
    let mut start = 0;

    for (i, &ch) in chars.iter().enumerate() {
        col += 1;
        let cut = is_special_char(ch)
            || chars.get(i + 1).copied().is_some_and(is_special_char)
            || i == chars.len() - 1;
        if cut {
            let text: String = chars[start..=i].iter().collect();
            let kind = if text == "\\" {
                TokenKind::Escape
            } else if text.chars().count() == 1 && is_special_char(ch) {
                TokenKind::Special
            } else {
                TokenKind::String
            };
            tokens.push(Token::new(text, kind, token_line, token_col));
            token_line = line;
            token_col = col + 1;
            start = i + 1;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
            if cut {
                token_line = line;
                token_col = 1;
            }
        }
    }
    (tokens, (line, col + 1))
}

fn collapse_blank_lines(tokens: &mut Vec<Token>) {
    tokens.dedup_by(|next, prev| next.is_newline() && prev.is_newline());
}

/// A backslash makes the following token literal. `n`, `t` and `r` at the
/// start of a string become the matching control character.
fn resolve_escapes(tokens: &mut Vec<Token>, errors: &mut Vec<Error>) {
    let mut resolved = Vec::with_capacity(tokens.len());
    let mut escaping = false;
    for mut token in tokens.drain(..) {
        if escaping {
            escaping = false;
            match token.kind {
                TokenKind::Special | TokenKind::Escape => token.kind = TokenKind::String,
                TokenKind::String => {
                    let mut rest = token.text.chars();
                    let control = match rest.next() {
                        Some('n') => Some('\n'),
                        Some('t') => Some('\t'),
                        Some('r') => Some('\r'),
                        _ => None,
                    };
                    match control {
                        Some(c) => token.text = std::iter::once(c).chain(rest).collect(),
                        None => errors.push(Error::syntax(
                            token.line,
                            token.col,
                            SyntaxError::InvalidEscape(token.text.clone()),
                        )),
                    }
                }
            }
            resolved.push(token);
        } else if token.kind == TokenKind::Escape {
            escaping = true;
        } else {
            resolved.push(token);
        }
    }
    *tokens = resolved;
}

/// Replace `a-e` with the literal string `abcde`. The endpoints are taken
/// from the neighbouring strings, which keep whatever else they held.
fn resolve_ranges(tokens: &mut Vec<Token>, errors: &mut Vec<Error>) {
    let mut c = 0;
    while c < tokens.len() {
        if !tokens[c].is_special('-') {
            c += 1;
            continue;
        }
        let (line, col) = (tokens[c].line, tokens[c].col);
        let usable = |t: Option<&Token>| t.is_some_and(|t| t.is_string() && !t.text.is_empty());
        if !usable(c.checked_sub(1).and_then(|p| tokens.get(p))) {
            errors.push(Error::syntax(line, col, SyntaxError::RangeWithoutStart));
            c += 1;
            continue;
        }
        if !usable(tokens.get(c + 1)) {
            errors.push(Error::syntax(line, col, SyntaxError::RangeWithoutEnd));
            c += 1;
            continue;
        }

        let pre = &mut tokens[c - 1];
        let Some(first) = pre.text.pop() else {
            c += 1;
            continue;
        };
        if pre.text.is_empty() {
            tokens.remove(c - 1);
            c -= 1;
        }

        let post = &mut tokens[c + 1];
        let last = post.text.remove(0);
        if post.text.is_empty() {
            tokens.remove(c + 1);
        }

        let range = &mut tokens[c];
        range.kind = TokenKind::String;
        range.text = (first as u32..=last as u32).filter_map(char::from_u32).collect();
        c += 1;
    }
}

fn merge_strings(tokens: &mut Vec<Token>) {
    tokens.dedup_by(|next, prev| {
        if prev.is_string() && next.is_string() {
            prev.text.push_str(&next.text);
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(code: &str) -> Vec<String> {
        scan(code)
            .expect("scan should succeed")
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    fn kinds(code: &str) -> Vec<TokenKind> {
        scan(code)
            .expect("scan should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn splits_around_specials() {
        assert_eq!(texts("main:<*>GOLF"), ["main", ":", "<", "*", ">", "GOLF", "\n"]);
        assert_eq!(
            kinds("m:ab"),
            [
                TokenKind::String,
                TokenKind::Special,
                TokenKind::String,
                TokenKind::Special
            ]
        );
    }

    #[test]
    fn appends_missing_newline_only_once() {
        assert_eq!(texts("m:a\n"), ["m", ":", "a", "\n"]);
        assert_eq!(texts(""), ["\n"]);
    }

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(texts("a:x\n\n\nb:y"), ["a", ":", "x", "\n", "b", ":", "y", "\n"]);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = scan("ab:c\nd:e").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.col)).collect();
        assert_eq!(
            positions,
            [(1, 1), (1, 3), (1, 4), (1, 5), (2, 1), (2, 2), (2, 3), (2, 4)]
        );
    }

    #[test]
    fn synthesized_newline_sits_at_end_of_code() {
        let tokens = scan("m:{x").unwrap();
        let last = tokens.last().unwrap();
        assert!(last.is_newline());
        assert_eq!((last.line, last.col), (1, 5));
    }

    #[test]
    fn escaped_special_becomes_literal() {
        assert_eq!(texts(r"m:\.x"), ["m", ":", ".x", "\n"]);
        assert_eq!(kinds(r"m:\.")[2], TokenKind::String);
        assert_eq!(texts(r"m:\\"), ["m", ":", "\\", "\n"]);
    }

    #[test]
    fn escaped_control_characters() {
        assert_eq!(texts(r"m:\tab"), ["m", ":", "\tab", "\n"]);
        assert_eq!(texts(r"m:\n"), ["m", ":", "\n", "\n"]);
    }

    #[test]
    fn invalid_escape_is_reported() {
        let errors = scan(r"m:\q").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "(ln 1, col 4) Invalid escape code 'q'.");
    }

    #[test]
    fn expands_character_ranges() {
        assert_eq!(texts("a-e"), ["abcde", "\n"]);
        assert_eq!(texts("m:[0-9]"), ["m", ":", "[", "0123456789", "]", "\n"]);
    }

    #[test]
    fn range_endpoints_are_trimmed_from_neighbours() {
        assert_eq!(texts("xa-cy"), ["xabcy", "\n"]);
    }

    #[test]
    fn backwards_range_is_empty() {
        assert_eq!(texts("[z-a]"), ["[", "", "]", "\n"]);
    }

    #[test]
    fn range_needs_strings_on_both_sides() {
        let errors = scan("m:-a").unwrap_err();
        assert_eq!(errors[0].to_string(), "(ln 1, col 3) range must be preceded by a string.");
        let errors = scan("m:a-(").unwrap_err();
        assert_eq!(errors[0].to_string(), "(ln 1, col 4) range must be followed by a string.");
    }
}
