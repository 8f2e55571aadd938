//! Recursive descent parser for SnakeEx token streams.
//!
//! Grammar, informally:
//!
//! ```text
//! program     := declaration*
//! declaration := NAME ['{' PARAMS '}'] ':' statements '\n'
//! statements  := '^' STRING | statement*          (closed by ) } ] > or newline)
//! statement   := ( '(' statements ')' | '<' direction '>' | '{' call '}'
//!                | '[' statements ']' | '$' | '.' | ('!'|'~'|'`') statement
//!                | STRING ) closure*
//! closure     := '*' | '+' | '?' | '%' '{' bounds '}'
//! ```

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::error::{Error, SyntaxError};

use super::ast::*;
use super::scanner::{Token, TokenKind};

/// Letters allowed in a `<...>` direction string.
const DIRECTION_LETTERS: &str = "RLFBPTX";

/// Special tokens allowed inside `<...>`.
const DIRECTION_SPECIALS: [char; 4] = ['*', '+', '.', '!'];

/// Parse a scanned token stream into a [`Program`].
pub fn parse_program(tokens: Vec<Token>) -> Result<Program, Vec<Error>> {
    let end = tokens
        .last()
        .map(|t| (t.line, t.col))
        .unwrap_or((1, 1));
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        end,
        errors: Vec::new(),
    };

    let mut declarations = Vec::new();
    while parser.tokens.peek().is_some() && parser.errors.is_empty() {
        match parser.parse_declaration() {
            Ok(declaration) => declarations.push(declaration),
            Err(err) => parser.errors.push(err),
        }
    }

    if parser.errors.is_empty() {
        Ok(Program { declarations })
    } else {
        Err(parser.errors)
    }
}

/// Whether a statement list is a sequence or, inside `[...]`, a set of
/// alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListOp {
    And,
    Or,
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    /// Location reported for errors at end of code.
    end: (usize, usize),
    /// Recoverable errors. Structural errors are returned instead.
    errors: Vec<Error>,
}

impl Parser {
    fn next(&mut self) -> Result<Token, Error> {
        self.tokens
            .next()
            .ok_or_else(|| self.error_at_end("token"))
    }

    fn peek_special(&mut self, ch: char) -> bool {
        self.tokens.peek().is_some_and(|t| t.is_special(ch))
    }

    fn expected(&self, token: &Token, expected: &'static str) -> Error {
        Error::syntax(
            token.line,
            token.col,
            SyntaxError::Expected {
                expected,
                got: token.text.escape_debug().to_string(),
            },
        )
    }

    fn error_at_end(&self, expected: &'static str) -> Error {
        Error::syntax(
            self.end.0,
            self.end.1,
            SyntaxError::Expected {
                expected,
                got: "end of code".into(),
            },
        )
    }

    /// Consume the special token `ch` or fail with "expected `what`".
    fn expect_special(&mut self, ch: char, what: &'static str) -> Result<Token, Error> {
        match self.tokens.next() {
            Some(token) if token.is_special(ch) => Ok(token),
            Some(token) => Err(self.expected(&token, what)),
            None => Err(self.error_at_end(what)),
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, Error> {
        let label = self.next()?;
        if !label.is_string() {
            return Err(self.expected(&label, "label"));
        }

        let params = if self.peek_special('{') {
            self.next()?;
            let params = self.parse_params()?;
            self.expect_special('}', "'}'")?;
            params
        } else {
            Params::default()
        };

        self.expect_special(':', "':'")?;
        let body = self.parse_statement_list(ListOp::And)?;
        self.expect_special('\n', "newline")?;

        Ok(Declaration {
            name: label.text,
            params,
            body,
        })
    }

    fn closes_statement_list(&mut self) -> bool {
        match self.tokens.peek() {
            None => true,
            Some(t) => [')', '}', ']', '>', '\n'].iter().any(|&c| t.is_special(c)),
        }
    }

    fn parse_statement_list(&mut self, op: ListOp) -> Result<Node, Error> {
        // A leading '^' turns the whole list into a negated character class.
        if self.peek_special('^') {
            return self.parse_negated_class();
        }

        let mut statements = Vec::new();
        while !self.closes_statement_list() {
            statements.push(self.parse_statement()?);
        }

        if op == ListOp::Or {
            statements = split_literals(statements);
        }
        let statements = detach_literal_operands(statements);

        Ok(match op {
            ListOp::And => Node::Sequence(statements),
            ListOp::Or => Node::Alternation(statements),
        })
    }

    fn parse_negated_class(&mut self) -> Result<Node, Error> {
        self.next()?; // consume '^'
        let token = self.next()?;
        if !token.is_string() {
            return Err(self.expected(&token, "string"));
        }
        Ok(Node::CharClass {
            chars: token.text,
            negate: true,
        })
    }

    fn parse_statement(&mut self) -> Result<Node, Error> {
        let token = self.next()?;
        let mut statement = match token.kind {
            TokenKind::String => Node::Literal(token.text),
            TokenKind::Special => match token.text.as_str() {
                "(" => {
                    let list = self.parse_statement_list(ListOp::And)?;
                    self.expect_special(')', "')'")?;
                    list
                }
                "<" => Node::Direction(self.parse_direction_body()?),
                "{" => Node::Call(self.parse_call_body()?),
                "[" => {
                    let list = self.parse_statement_list(ListOp::Or)?;
                    self.expect_special(']', "']'")?;
                    list
                }
                "$" => Node::OutOfBounds,
                "." => Node::Wildcard,
                "!" | "~" | "`" => {
                    let op = match token.text.as_str() {
                        "!" => LookAround::Not,
                        "~" => LookAround::Transparent,
                        _ => LookAround::MarkedOnly,
                    };
                    let inner = self.parse_statement()?;
                    Node::LookAround {
                        op,
                        inner: Box::new(inner),
                    }
                }
                _ => return Err(self.expected(&token, "statement")),
            },
            TokenKind::Escape => return Err(self.expected(&token, "statement")),
        };

        while let Some(repeat) = self.parse_closure_op()? {
            statement = Node::Closure {
                inner: Box::new(statement),
                repeat,
            };
        }
        Ok(statement)
    }

    /// Parse one closure suffix, if there is one.
    fn parse_closure_op(&mut self) -> Result<Option<Repeat>, Error> {
        let repeat = if self.peek_special('*') {
            Repeat::ZeroOrMore
        } else if self.peek_special('+') {
            Repeat::OneOrMore
        } else if self.peek_special('?') {
            Repeat::Optional
        } else if self.peek_special('%') {
            self.next()?;
            return Ok(Some(Repeat::Bounded(self.parse_bounds()?)));
        } else {
            return Ok(None);
        };
        self.next()?;
        Ok(Some(repeat))
    }

    /// Parse `{m,n}`, `{m}`, `{m,}` or `{,n}` after a `%`.
    fn parse_bounds(&mut self) -> Result<Bounds, Error> {
        self.expect_special('{', "'{'")?;
        let token = self.next()?;
        if !token.is_string() {
            return Err(self.expected(&token, "number or ','"));
        }

        let mut bounds = Bounds::default();
        let parts: Vec<&str> = token.text.split(',').collect();
        match parts.as_slice() {
            [single] => {
                let n = self.parse_bound(&token, single);
                bounds.min = n;
                bounds.max = n;
            }
            ["", ""] => self.errors.push(Error::syntax(
                token.line,
                token.col,
                SyntaxError::NotEnoughBounds,
            )),
            [min, max] => {
                if !min.is_empty() {
                    bounds.min = self.parse_bound(&token, min);
                }
                if !max.is_empty() {
                    bounds.max = self.parse_bound(&token, max);
                }
            }
            _ => self.errors.push(Error::syntax(
                token.line,
                token.col,
                SyntaxError::TooManyBounds,
            )),
        }

        self.expect_special('}', "'}'")?;
        Ok(bounds)
    }

    fn parse_bound(&mut self, token: &Token, text: &str) -> Option<usize> {
        match text.trim().parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                let err = self.expected(token, "integer");
                self.errors.push(err);
                None
            }
        }
    }

    /// Parse a direction after its opening `<`, through the closing `>`.
    fn parse_direction_body(&mut self) -> Result<DirectionSpec, Error> {
        let mut spec = DirectionSpec {
            turns: String::new(),
            absolute: false,
        };
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::String if token.text.chars().all(|c| DIRECTION_LETTERS.contains(c)) => {
                    spec.turns.push_str(&token.text);
                }
                TokenKind::Special if token.is_special('.') => spec.absolute = true,
                TokenKind::Special if DIRECTION_SPECIALS.iter().any(|&c| token.is_special(c)) => {
                    spec.turns.push_str(&token.text);
                }
                _ if token.is_special('>') => break,
                _ => return Err(self.expected(&token, "'>'")),
            }
        }
        if spec.turns.is_empty() {
            spec.turns.push('F');
        }
        Ok(spec)
    }

    /// Parse a call after its opening `{`, through the closing `}`.
    fn parse_call_body(&mut self) -> Result<Call, Error> {
        let name = self.next()?;
        if !name.is_string() {
            return Err(self.expected(&name, "label"));
        }
        self.expect_special('<', "'<'")?;
        let direction = self.parse_direction_body()?;
        let params = if self.tokens.peek().is_some_and(Token::is_string) {
            self.parse_params()?
        } else {
            Params::default()
        };
        self.expect_special('}', "'}'")?;
        Ok(Call {
            name: name.text,
            direction,
            params,
        })
    }

    /// Parse a flag string such as `EI` or `WA1`.
    fn parse_params(&mut self) -> Result<Params, Error> {
        let token = self.next()?;
        let mut params = Params::default();
        for ch in token.text.chars() {
            match ch {
                'P' => params.piggyback = true,
                'H' => params.wrap_x = true,
                'V' => params.wrap_y = true,
                'W' => {
                    params.wrap_x = true;
                    params.wrap_y = true;
                }
                'E' => params.exclusive = true,
                'I' => params.insensitive = true,
                'A' => params.advance = true,
                'S' => params.no_mark = true,
                'L' => params.only_marked = true,
                '0'..='9' => params.group = Some(ch as u8 - b'0'),
                other => self.errors.push(Error::syntax(
                    token.line,
                    token.col,
                    SyntaxError::UnrecognizedParam(other),
                )),
            }
        }
        Ok(params)
    }
}

/// Inside `[...]`, `abc` means any one of `a`, `b` or `c`.
fn split_literals(statements: Vec<Node>) -> Vec<Node> {
    let mut split = Vec::with_capacity(statements.len());
    for statement in statements {
        match statement {
            Node::Literal(text) if text.chars().count() > 1 => {
                split.extend(text.chars().map(|c| Node::Literal(c.to_string())));
            }
            other => split.push(other),
        }
    }
    split
}

/// A closure on a bare literal applies to its last character (`ab*` is
/// `a(b*)`), and a look-around applies to its first (`!ab` is `(!a)b`).
fn detach_literal_operands(statements: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(statements.len());
    for statement in statements {
        match statement {
            Node::Closure { inner, repeat } => match *inner {
                Node::Literal(mut text) if text.chars().count() > 1 => {
                    let last = text.pop().map(String::from).unwrap_or_default();
                    out.push(Node::Literal(text));
                    out.push(Node::Closure {
                        inner: Box::new(Node::Literal(last)),
                        repeat,
                    });
                }
                inner => out.push(Node::Closure {
                    inner: Box::new(inner),
                    repeat,
                }),
            },
            Node::LookAround { op, inner } => match *inner {
                Node::Literal(text) if text.chars().count() > 1 => {
                    let mut chars = text.chars();
                    let first = chars.next().map(String::from).unwrap_or_default();
                    let rest: String = chars.collect();
                    out.push(Node::LookAround {
                        op,
                        inner: Box::new(Node::Literal(first)),
                    });
                    out.push(Node::Literal(rest));
                }
                inner => out.push(Node::LookAround {
                    op,
                    inner: Box::new(inner),
                }),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::scanner::scan;

    fn parse_ok(code: &str) -> Program {
        parse_program(scan(code).expect("scan should succeed")).expect("parse should succeed")
    }

    fn parse_err(code: &str) -> Vec<Error> {
        parse_program(scan(code).expect("scan should succeed")).expect_err("parse should fail")
    }

    fn body(code: &str) -> Node {
        parse_ok(code).declarations.remove(0).body
    }

    fn lit(s: &str) -> Node {
        Node::Literal(s.into())
    }

    fn seq(nodes: Vec<Node>) -> Node {
        Node::Sequence(nodes)
    }

    fn closure(inner: Node, repeat: Repeat) -> Node {
        Node::Closure {
            inner: Box::new(inner),
            repeat,
        }
    }

    fn bounds_of(code: &str) -> Bounds {
        match body(code) {
            Node::Sequence(nodes) => match &nodes[0] {
                Node::Closure {
                    repeat: Repeat::Bounded(b),
                    ..
                } => *b,
                other => panic!("expected bounded closure, got {other:?}"),
            },
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    // --- Declarations ---

    #[test]
    fn declarations_in_order() {
        let program = parse_ok("main:{a<>}\na:x\nb:y");
        let names: Vec<_> = program.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["main", "a", "b"]);
    }

    #[test]
    fn declaration_params() {
        let program = parse_ok("m{EI}:a");
        let params = program.declarations[0].params;
        assert!(params.exclusive && params.insensitive);
        assert!(!params.piggyback);
    }

    #[test]
    fn empty_body() {
        assert_eq!(body("m:"), seq(vec![]));
    }

    // --- Statements ---

    #[test]
    fn word_search() {
        assert_eq!(
            body("main:<*>GOLF"),
            seq(vec![
                Node::Direction(DirectionSpec {
                    turns: "*".into(),
                    absolute: false
                }),
                lit("GOLF"),
            ])
        );
    }

    #[test]
    fn wildcard_out_of_bounds_and_groups() {
        assert_eq!(
            body("m:$(.)$"),
            seq(vec![
                Node::OutOfBounds,
                seq(vec![Node::Wildcard]),
                Node::OutOfBounds
            ])
        );
    }

    #[test]
    fn class_splits_literals_into_alternatives() {
        assert_eq!(
            body("m:[ab(cd)]"),
            seq(vec![Node::Alternation(vec![
                lit("a"),
                lit("b"),
                seq(vec![lit("cd")]),
            ])])
        );
    }

    #[test]
    fn caret_makes_negated_class() {
        assert_eq!(
            body("m:[^Qq]"),
            seq(vec![Node::CharClass {
                chars: "Qq".into(),
                negate: true
            }])
        );
    }

    #[test]
    fn closure_binds_to_last_character() {
        assert_eq!(
            body("m:ab*"),
            seq(vec![lit("a"), closure(lit("b"), Repeat::ZeroOrMore)])
        );
    }

    #[test]
    fn stacked_closures_wrap_previous() {
        assert_eq!(
            body("m:.+?"),
            seq(vec![closure(
                closure(Node::Wildcard, Repeat::OneOrMore),
                Repeat::Optional
            )])
        );
    }

    #[test]
    fn look_around_binds_to_first_character() {
        assert_eq!(
            body("m:~ab"),
            seq(vec![
                Node::LookAround {
                    op: LookAround::Transparent,
                    inner: Box::new(lit("a"))
                },
                lit("b"),
            ])
        );
    }

    #[test]
    fn marked_only_and_not() {
        assert_eq!(
            body("m:!`."),
            seq(vec![Node::LookAround {
                op: LookAround::Not,
                inner: Box::new(Node::LookAround {
                    op: LookAround::MarkedOnly,
                    inner: Box::new(Node::Wildcard)
                })
            }])
        );
    }

    // --- Directions and calls ---

    #[test]
    fn empty_direction_is_forward() {
        assert_eq!(body("m:<>"), seq(vec![Node::Direction(DirectionSpec::forward())]));
    }

    #[test]
    fn absolute_direction_combines() {
        assert_eq!(
            body("m:<.RB>"),
            seq(vec![Node::Direction(DirectionSpec {
                turns: "RB".into(),
                absolute: true
            })])
        );
    }

    #[test]
    fn call_with_flags() {
        match body("m:{c<R>WA1}") {
            Node::Sequence(nodes) => match &nodes[0] {
                Node::Call(call) => {
                    assert_eq!(call.name, "c");
                    assert_eq!(call.direction.turns, "R");
                    assert!(call.params.wrap_x && call.params.wrap_y && call.params.advance);
                    assert_eq!(call.params.group, Some(1));
                }
                other => panic!("expected call, got {other:?}"),
            },
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    // --- Bounds ---

    #[test]
    fn bounds_forms() {
        assert_eq!(
            bounds_of("m:.%{2,}"),
            Bounds {
                min: Some(2),
                max: None
            }
        );
        assert_eq!(
            bounds_of("m:.%{,5}"),
            Bounds {
                min: None,
                max: Some(5)
            }
        );
        assert_eq!(
            bounds_of("m:.%{3}"),
            Bounds {
                min: Some(3),
                max: Some(3)
            }
        );
        assert_eq!(
            bounds_of("m:.%{2,22}"),
            Bounds {
                min: Some(2),
                max: Some(22)
            }
        );
    }

    #[test]
    fn malformed_bounds() {
        let errors = parse_err("m:.%{,}");
        assert_eq!(errors[0].to_string(), "(ln 1, col 6) not enough values in bounds.");
        let errors = parse_err("m:.%{x}");
        assert_eq!(errors[0].to_string(), "(ln 1, col 6) expected integer, got 'x'.");
        let errors = parse_err("m:.%{1,2,3}");
        assert_eq!(errors[0].to_string(), "(ln 1, col 6) too many values in bounds.");
        let errors = parse_err("m:.%{}");
        assert_eq!(
            errors[0].to_string(),
            "(ln 1, col 6) expected number or ',', got '}'."
        );
    }

    // --- Errors ---

    #[test]
    fn unmatched_brace_reports_end_of_code() {
        let errors = parse_err("main:{foo<>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), r"(ln 1, col 12) expected '}', got '\n'.");
    }

    #[test]
    fn unrecognized_flags_are_all_reported() {
        let errors = parse_err("m:{c<>QZ}");
        let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "(ln 1, col 7) Unrecognized parameter 'Q'.",
                "(ln 1, col 7) Unrecognized parameter 'Z'."
            ]
        );
    }

    #[test]
    fn missing_colon() {
        let errors = parse_err("main<>");
        assert_eq!(errors[0].to_string(), "(ln 1, col 5) expected ':', got '<'.");
    }

    #[test]
    fn missing_label() {
        let errors = parse_err(":a");
        assert_eq!(errors[0].to_string(), "(ln 1, col 1) expected label, got ':'.");
    }

    #[test]
    fn stray_close_paren() {
        let errors = parse_err("m:a)");
        assert_eq!(errors[0].to_string(), "(ln 1, col 4) expected newline, got ')'.");
    }

    #[test]
    fn bad_direction() {
        let errors = parse_err("m:<Q>");
        assert_eq!(errors[0].to_string(), "(ln 1, col 4) expected '>', got 'Q'.");
    }
}
