use crate::parser::error::EvalError;
use std::fmt;

/// Lexical category of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Operator,       // + - * / ^
    Number,         // 2, 0.5, .5
    SignedNumber,   // -2, +0.5
    Variable,       // x, pi, foo_1
    SignedVariable, // -x, +y
    Equals,         // =
    LeftParen,      // (
    RightParen,     // )
    Function,       // f(...)
    SignedFunction, // -f(...)
    Whitespace,     // recognized, never emitted
}

impl TokenKind {
    /// Kinds tried at every cursor position, in tie-breaking order.
    /// Function kinds are never matched directly; they are promoted from
    /// variables when a call-style `(` follows.
    const CANDIDATES: [TokenKind; 9] = [
        TokenKind::Operator,
        TokenKind::Number,
        TokenKind::SignedNumber,
        TokenKind::Variable,
        TokenKind::SignedVariable,
        TokenKind::Equals,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::Whitespace,
    ];

    /// Whether this kind stands for a value in the reduction
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::SignedNumber
                | TokenKind::Variable
                | TokenKind::SignedVariable
                | TokenKind::Function
                | TokenKind::SignedFunction
        )
    }

    fn is_signed(self) -> bool {
        matches!(self, TokenKind::SignedNumber | TokenKind::SignedVariable)
    }
}

/// A classified slice of the input
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Source text, including a leading sign for signed kinds
    pub raw: String,
    pub kind: TokenKind,
    /// Argument text between the call parentheses (function kinds only)
    pub inner: Option<String>,
}

impl Token {
    pub fn new(raw: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            raw: raw.into(),
            kind,
            inner: None,
        }
    }

    /// Build a call token, e.g. `Token::call("-f", "x+1")`
    pub fn call(raw: impl Into<String>, inner: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = if raw.starts_with(['+', '-']) {
            TokenKind::SignedFunction
        } else {
            TokenKind::Function
        };
        Token {
            raw,
            kind,
            inner: Some(inner.into()),
        }
    }

    pub fn is_operand(&self) -> bool {
        self.kind.is_operand()
    }

    /// The raw text with any leading sign removed, and the sign as a factor
    pub fn unsigned_name(&self) -> (&str, f64) {
        match self.raw.strip_prefix('-') {
            Some(rest) => (rest, -1.0),
            None => (self.raw.strip_prefix('+').unwrap_or(&self.raw), 1.0),
        }
    }
}

impl fmt::Display for Token {
    /// Writes the re-parseable form of the token
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "{}({})", self.raw, inner),
            None => write!(f, "{}", self.raw),
        }
    }
}

/// Whether `name` is exactly one identifier
pub fn is_identifier(name: &str) -> bool {
    let chars: Vec<char> = name.chars().collect();
    identifier_len(&chars) == Some(chars.len())
}

fn identifier_len(s: &[char]) -> Option<usize> {
    match s.first() {
        Some(c) if c.is_ascii_alphabetic() => Some(
            1 + s[1..]
                .iter()
                .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
                .count(),
        ),
        _ => None,
    }
}

fn digits_len(s: &[char]) -> usize {
    s.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// `\d+(\.\d+)?` or `\.\d+`; any number of integer digits may precede the point
fn number_len(s: &[char]) -> Option<usize> {
    let int = digits_len(s);
    if int > 0 {
        if s.get(int) == Some(&'.') {
            let frac = digits_len(&s[int + 1..]);
            if frac > 0 {
                return Some(int + 1 + frac);
            }
        }
        return Some(int);
    }
    if s.first() == Some(&'.') {
        let frac = digits_len(&s[1..]);
        if frac > 0 {
            return Some(1 + frac);
        }
    }
    None
}

fn signed(s: &[char], unsigned: fn(&[char]) -> Option<usize>) -> Option<usize> {
    match s.first() {
        Some('+') | Some('-') => unsigned(&s[1..]).map(|len| len + 1),
        _ => None,
    }
}

fn single(s: &[char], expected: &[char]) -> Option<usize> {
    s.first().filter(|c| expected.contains(c)).map(|_| 1)
}

/// Converts an expression string into tokens
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Length of the match of `kind` at the cursor, if any
    fn match_len(&self, kind: TokenKind) -> Option<usize> {
        let rest = &self.input[self.position..];
        match kind {
            TokenKind::Operator => single(rest, &['+', '-', '*', '/', '^']),
            TokenKind::Number => number_len(rest),
            TokenKind::SignedNumber => signed(rest, number_len),
            TokenKind::Variable => identifier_len(rest),
            TokenKind::SignedVariable => signed(rest, identifier_len),
            TokenKind::Equals => single(rest, &['=']),
            TokenKind::LeftParen => single(rest, &['(']),
            TokenKind::RightParen => single(rest, &[')']),
            TokenKind::Whitespace => {
                let len = rest.iter().take_while(|c| **c == ' ' || **c == '\t').count();
                (len > 0).then_some(len)
            }
            TokenKind::Function | TokenKind::SignedFunction => None,
        }
    }

    /// Longest eligible match at the cursor; earlier candidates win ties
    fn longest_match(&self, previous: Option<&Token>) -> Option<(TokenKind, usize)> {
        // A sign directly after a value or `)` is a binary operator
        let signs_allowed = match previous {
            None => true,
            Some(token) => !(token.is_operand() || token.kind == TokenKind::RightParen),
        };

        let mut best: Option<(TokenKind, usize)> = None;
        for kind in TokenKind::CANDIDATES {
            if kind.is_signed() && !signs_allowed {
                continue;
            }
            if let Some(len) = self.match_len(kind) {
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((kind, len));
                }
            }
        }
        best
    }

    /// Collect the call argument up to the matching `)`, which is consumed
    fn read_call_argument(&mut self) -> Result<String, EvalError> {
        let mut depth = 1usize;
        let mut argument = String::new();

        while let Some(&ch) = self.input.get(self.position) {
            self.position += 1;
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(argument);
                    }
                }
                _ => {}
            }
            argument.push(ch);
        }

        Err(EvalError::FunctionCallParse)
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens: Vec<Token> = Vec::new();

        while self.position < self.input.len() {
            let (kind, len) = self
                .longest_match(tokens.last())
                .ok_or(EvalError::Lex {
                    position: self.position,
                })?;
            let raw: String = self.input[self.position..self.position + len]
                .iter()
                .collect();
            self.position += len;

            match kind {
                TokenKind::Whitespace => {}
                TokenKind::LeftParen
                    if matches!(
                        tokens.last().map(|t| t.kind),
                        Some(TokenKind::Variable | TokenKind::SignedVariable)
                    ) =>
                {
                    let argument = self.read_call_argument()?;
                    if let Some(callee) = tokens.last_mut() {
                        callee.kind = match callee.kind {
                            TokenKind::SignedVariable => TokenKind::SignedFunction,
                            _ => TokenKind::Function,
                        };
                        callee.inner = Some(argument);
                    }
                }
                _ => tokens.push(Token::new(raw, kind)),
            }
        }

        Ok(tokens)
    }
}

/// Tokenize `input` in one call
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn raws(input: &str) -> Vec<String> {
        tokenize(input).unwrap().into_iter().map(|t| t.raw).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("1+x*(2)=y"),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Variable,
                TokenKind::Operator,
                TokenKind::LeftParen,
                TokenKind::Number,
                TokenKind::RightParen,
                TokenKind::Equals,
                TokenKind::Variable,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_discarded() {
        assert_eq!(raws("  1 +\t2 "), vec!["1", "+", "2"]);
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(raws("3.25+.5"), vec!["3.25", "+", ".5"]);
        assert_eq!(raws("12.5"), vec!["12.5"]);
        assert_eq!(tokenize("1."), Err(EvalError::Lex { position: 1 }));
    }

    #[test]
    fn test_multi_digit_decimal_evaluates_whole() {
        let mut evaluator = crate::parser::Evaluator::new();
        assert_eq!(evaluator.evaluate("12.5*2").unwrap().result, Some(25.0));
    }

    #[test]
    fn test_tab_separated_input() {
        assert_eq!(raws("1\t+2"), vec!["1", "+", "2"]);
    }

    #[test]
    fn test_leading_sign_is_part_of_number() {
        let tokens = tokenize("-2").unwrap();
        assert_eq!(tokens, vec![Token::new("-2", TokenKind::SignedNumber)]);
    }

    #[test]
    fn test_binary_minus_then_unary_minus() {
        assert_eq!(raws("2--1"), vec!["2", "-", "-1"]);
        assert_eq!(
            kinds("2--1"),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::SignedNumber
            ]
        );
    }

    #[test]
    fn test_no_sign_after_right_paren() {
        assert_eq!(raws("(5-4)-1"), vec!["(", "5", "-", "4", ")", "-", "1"]);
        assert_eq!(raws("(5-4)*-1"), vec!["(", "5", "-", "4", ")", "*", "-1"]);
    }

    #[test]
    fn test_signed_variables() {
        assert_eq!(raws("3 * -x - +y"), vec!["3", "*", "-x", "-", "+y"]);
        assert_eq!(
            kinds("+5-+3"),
            vec![
                TokenKind::SignedNumber,
                TokenKind::Operator,
                TokenKind::SignedNumber
            ]
        );
    }

    #[test]
    fn test_function_call_detection() {
        let tokens = tokenize("3+f(g(1)*2)").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2], Token::call("f", "g(1)*2"));
        assert_eq!(tokens[2].to_string(), "f(g(1)*2)");
    }

    #[test]
    fn test_signed_function_call() {
        let tokens = tokenize("-sin(x)").unwrap();
        assert_eq!(tokens, vec![Token::call("-sin", "x")]);
        assert_eq!(tokens[0].unsigned_name(), ("sin", -1.0));
    }

    #[test]
    fn test_call_after_whitespace() {
        let tokens = tokenize("f (2)").unwrap();
        assert_eq!(tokens, vec![Token::call("f", "2")]);
    }

    #[test]
    fn test_unbalanced_call() {
        assert_eq!(tokenize("1 + f(4"), Err(EvalError::FunctionCallParse));
        assert_eq!(tokenize("f((1)"), Err(EvalError::FunctionCallParse));
    }

    #[test]
    fn test_bad_token_position() {
        assert_eq!(tokenize("1+[]"), Err(EvalError::Lex { position: 2 }));
        assert_eq!(tokenize("x = 1.5 $"), Err(EvalError::Lex { position: 8 }));
    }

    #[test]
    fn test_position_counts_characters() {
        assert_eq!(tokenize("f(é)+#"), Err(EvalError::Lex { position: 5 }));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("x"));
        assert!(is_identifier("rate_2"));
        assert!(!is_identifier("x+1"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier(""));
    }
}
