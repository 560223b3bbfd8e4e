//! Expression evaluation
//!
//! A line is either an assignment (`x=...`), a function declaration
//! (`f(x)=...`) or a plain expression. Plain expressions are ordered into a
//! postfix list with a precedence key per operator, then reduced by
//! repeatedly collapsing the first `operand operand operator` triple.

use crate::parser::error::EvalError;
use crate::parser::lexer::{is_identifier, tokenize, Token, TokenKind};
use crate::parser::symbols::{SymbolEntry, SymbolTable};
use tracing::{debug, trace};

/// Result of one `evaluate` call
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// Numeric value; `None` only for a function declaration
    pub result: Option<f64>,
    /// Set for assignments and declarations
    pub message: Option<String>,
    /// Copy of the symbol table after the call
    pub symbols: SymbolTable,
}

impl EvaluationOutcome {
    /// What a REPL prints: the message if any, else the result
    pub fn display_text(&self) -> String {
        match (&self.message, self.result) {
            (Some(message), _) => message.clone(),
            (None, Some(value)) => format_number(value),
            (None, None) => String::new(),
        }
    }
}

/// Format a number the way results are shown to the user
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        // Exponent form with an explicit sign, e.g. 1.5e+21, 1e-7
        let text = format!("{:e}", value);
        if text.contains("e-") {
            text
        } else {
            text.replacen('e', "e+", 1)
        }
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    fn from_token(token: &Token) -> Result<Self, EvalError> {
        match token.raw.as_str() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            other => Err(EvalError::malformed(other)),
        }
    }

    fn base_precedence(self) -> f64 {
        match self {
            Operator::Add | Operator::Subtract => 1.0,
            Operator::Multiply | Operator::Divide => 2.0,
            Operator::Power => 3.0,
        }
    }

    /// Operators nested deeper in parentheses always outrank shallower ones
    fn precedence_key(self, depth: i32) -> f64 {
        self.base_precedence() + 10f64.powi(depth)
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
        }
    }
}

/// One slot of the postfix list
#[derive(Debug, Clone, Copy)]
enum Entry<'a> {
    /// Unresolved operand, looked up when its triple is reduced
    Operand(&'a Token),
    /// Result of an earlier reduction
    Value(f64),
    Operator(Operator, &'a Token),
}

impl Entry<'_> {
    fn is_operand(&self) -> bool {
        !matches!(self, Entry::Operator(..))
    }

    fn raw(&self) -> String {
        match self {
            Entry::Operand(token) | Entry::Operator(_, token) => token.raw.clone(),
            Entry::Value(value) => format_number(*value),
        }
    }
}

/// Shape of a token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Assignment,
    Declaration,
    Expression,
}

impl Form {
    fn of(tokens: &[Token]) -> Form {
        match tokens {
            [name, equals, ..]
                if name.kind == TokenKind::Variable && equals.kind == TokenKind::Equals =>
            {
                Form::Assignment
            }
            [call, equals, ..]
                if call.kind == TokenKind::Function
                    && equals.kind == TokenKind::Equals
                    && call.inner.as_deref().is_some_and(is_identifier) =>
            {
                Form::Declaration
            }
            _ => Form::Expression,
        }
    }
}

/// Order operands and operators for reduction.
///
/// Parentheses only change the nesting depth. An incoming operator first
/// flushes every pending operator whose key is at least its own.
fn to_postfix(tokens: &[Token]) -> Result<Vec<Entry<'_>>, EvalError> {
    let mut depth: i32 = 0;
    let mut pending: Vec<(Operator, &Token, f64)> = Vec::new();
    let mut output = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => depth -= 1,
            TokenKind::Operator => {
                let operator = Operator::from_token(token)?;
                let key = operator.precedence_key(depth);
                while let Some(&(top, top_token, top_key)) = pending.last() {
                    if top_key < key {
                        break;
                    }
                    output.push(Entry::Operator(top, top_token));
                    pending.pop();
                }
                pending.push((operator, token, key));
            }
            TokenKind::Number
            | TokenKind::SignedNumber
            | TokenKind::Variable
            | TokenKind::SignedVariable
            | TokenKind::Function
            | TokenKind::SignedFunction => output.push(Entry::Operand(token)),
            // Stray `=` takes no part in the reduction
            TokenKind::Equals | TokenKind::Whitespace => {}
        }
    }

    while let Some((operator, token, _)) = pending.pop() {
        output.push(Entry::Operator(operator, token));
    }

    Ok(output)
}

fn postfix_text(entries: &[Entry<'_>]) -> String {
    entries.iter().map(Entry::raw).collect::<Vec<_>>().join(" ")
}

/// Evaluates expressions against a symbol table it owns
#[derive(Debug, Clone)]
pub struct Evaluator {
    symbols: SymbolTable,
}

impl Evaluator {
    /// Create an evaluator with the builtin functions and constants
    pub fn new() -> Self {
        Evaluator::with_symbols(SymbolTable::with_builtins())
    }

    /// Create an evaluator over an existing table
    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Evaluator { symbols }
    }

    /// The live symbol table
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Drop every assignment and declaration made so far
    pub fn reset(&mut self) {
        self.symbols = SymbolTable::with_builtins();
    }

    /// Evaluate one line
    pub fn evaluate(&mut self, expression: &str) -> Result<EvaluationOutcome, EvalError> {
        let tokens = tokenize(expression)?;
        debug!(expression, token_count = tokens.len(), "tokenized");
        self.evaluate_tokens(&tokens)
    }

    fn outcome(&self, result: Option<f64>, message: Option<String>) -> EvaluationOutcome {
        EvaluationOutcome {
            result,
            message,
            symbols: self.symbols.snapshot(),
        }
    }

    fn evaluate_tokens(&mut self, tokens: &[Token]) -> Result<EvaluationOutcome, EvalError> {
        match Form::of(tokens) {
            Form::Assignment => {
                let (name, value) = self.assign(tokens)?;
                let message = format!("set {} to {}", name, format_number(value));
                Ok(self.outcome(Some(value), Some(message)))
            }
            Form::Declaration => {
                let message = self.declare(tokens)?;
                Ok(self.outcome(None, Some(message)))
            }
            Form::Expression => {
                let value = self.reduce(tokens)?;
                Ok(self.outcome(Some(value), None))
            }
        }
    }

    /// `name=...`; the right-hand side is fully evaluated before the store
    fn assign(&mut self, tokens: &[Token]) -> Result<(String, f64), EvalError> {
        let name = tokens[0].raw.clone();
        let value = self.evaluate_number_tokens(&tokens[2..])?;
        self.symbols.set(name.clone(), SymbolEntry::Variable(value));
        debug!(%name, value, "assigned variable");
        Ok((name, value))
    }

    /// `name(param)=body`; returns the declaration message
    fn declare(&mut self, tokens: &[Token]) -> Result<String, EvalError> {
        let body_tokens = &tokens[2..];
        if Form::of(body_tokens) == Form::Declaration {
            return Err(EvalError::malformed(body_tokens[1].raw.clone()));
        }

        let name = tokens[0].raw.clone();
        let parameter = tokens[0].inner.clone().unwrap_or_default();
        let body: String = body_tokens.iter().map(Token::to_string).collect();
        if body.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        debug!(%name, %parameter, %body, "declared function");
        let message = format!("declared function {}({})", name, parameter);
        self.symbols
            .set(name, SymbolEntry::user_function(parameter, body));
        Ok(message)
    }

    /// Evaluate tokens that must produce a number
    fn evaluate_number_tokens(&mut self, tokens: &[Token]) -> Result<f64, EvalError> {
        match Form::of(tokens) {
            Form::Assignment => self.assign(tokens).map(|(_, value)| value),
            Form::Declaration => Err(EvalError::malformed(tokens[1].raw.clone())),
            Form::Expression => self.reduce(tokens),
        }
    }

    fn evaluate_number(&mut self, expression: &str) -> Result<f64, EvalError> {
        let tokens = tokenize(expression)?;
        self.evaluate_number_tokens(&tokens)
    }

    /// Resolve an operand token to its value
    fn lookup(&self, token: &Token) -> Result<f64, EvalError> {
        match token.kind {
            TokenKind::Number | TokenKind::SignedNumber => token
                .raw
                .parse::<f64>()
                .map_err(|_| EvalError::malformed(token.raw.clone())),
            TokenKind::Variable | TokenKind::SignedVariable => {
                let (name, sign) = token.unsigned_name();
                match self.symbols.lookup(name)? {
                    SymbolEntry::Variable(value) => Ok(sign * value),
                    SymbolEntry::NativeFunction(_) | SymbolEntry::UserFunction(_) => {
                        Err(EvalError::unknown(name))
                    }
                }
            }
            TokenKind::Function | TokenKind::SignedFunction => self.invoke(token),
            TokenKind::Operator
            | TokenKind::Equals
            | TokenKind::LeftParen
            | TokenKind::RightParen
            | TokenKind::Whitespace => Err(EvalError::malformed(token.raw.clone())),
        }
    }

    /// Call a native or user function.
    ///
    /// The argument and the body each run in their own evaluator over a
    /// snapshot of this table, so nothing they bind leaks back here.
    /// A variable used with call syntax yields its value and the argument
    /// is never evaluated.
    /// A user function without a terminating case recurses until the stack
    /// is exhausted.
    fn invoke(&self, token: &Token) -> Result<f64, EvalError> {
        let (name, sign) = token.unsigned_name();
        let entry = self.symbols.lookup(name)?;
        if let SymbolEntry::Variable(value) = entry {
            return Ok(sign * value);
        }

        let argument_text = token.inner.as_deref().unwrap_or_default();
        let argument =
            Evaluator::with_symbols(self.symbols.snapshot()).evaluate_number(argument_text)?;
        trace!(function = name, argument, "invoking");

        match entry {
            SymbolEntry::NativeFunction(native) => Ok(sign * native(argument)),
            SymbolEntry::UserFunction(function) => {
                let mut scope = self.symbols.snapshot();
                scope.set(
                    function.bound_variable.clone(),
                    SymbolEntry::Variable(argument),
                );
                let value = Evaluator::with_symbols(scope).evaluate_number(&function.body)?;
                Ok(sign * value)
            }
            SymbolEntry::Variable(value) => Ok(sign * value),
        }
    }

    fn resolve(&self, entry: &Entry<'_>) -> Result<f64, EvalError> {
        match entry {
            Entry::Operand(token) => self.lookup(token),
            Entry::Value(value) => Ok(*value),
            Entry::Operator(_, token) => Err(EvalError::malformed(token.raw.clone())),
        }
    }

    /// Evaluate a plain expression
    fn reduce(&self, tokens: &[Token]) -> Result<f64, EvalError> {
        let mut entries = to_postfix(tokens)?;
        debug!(postfix = %postfix_text(&entries), "ordered expression");

        if entries.is_empty() {
            return Err(EvalError::EmptyExpression);
        }

        loop {
            let triple = entries.windows(3).enumerate().find_map(|(i, window)| match window {
                [left, right, Entry::Operator(operator, _)]
                    if left.is_operand() && right.is_operand() =>
                {
                    Some((i, *operator))
                }
                _ => None,
            });
            let Some((i, operator)) = triple else {
                break;
            };

            let left = self.resolve(&entries[i])?;
            let right = self.resolve(&entries[i + 1])?;
            let value = operator.apply(left, right);
            trace!(left, ?operator, right, value, "reduced");
            entries.splice(i..i + 3, [Entry::Value(value)]);
        }

        if entries.len() > 1 {
            return Err(EvalError::malformed(entries[1].raw()));
        }
        self.resolve(&entries[0])
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a single line with a fresh evaluator
pub fn evaluate(expression: &str) -> Result<EvaluationOutcome, EvalError> {
    Evaluator::new().evaluate(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix(input: &str) -> String {
        let tokens = tokenize(input).unwrap();
        postfix_text(&to_postfix(&tokens).unwrap())
    }

    #[test]
    fn test_postfix_precedence() {
        assert_eq!(postfix("1+2*3"), "1 2 3 * +");
        assert_eq!(postfix("3-2-1"), "3 2 - 1 -");
        assert_eq!(postfix("1+4*2^3"), "1 4 2 3 ^ * +");
    }

    #[test]
    fn test_postfix_parentheses() {
        assert_eq!(postfix("2*(1+3)"), "2 1 3 + *");
        assert_eq!(postfix("3^((2-1)*3)"), "3 2 1 - 3 * ^");
    }

    #[test]
    fn test_power_chain_flushes_left_to_right() {
        assert_eq!(postfix("2^3^2"), "2 3 ^ 2 ^");
    }

    #[test]
    fn test_postfix_skips_stray_equals() {
        assert_eq!(postfix("1=2"), "1 2");
    }

    #[test]
    fn test_precedence_key_depth_dominates() {
        assert!(Operator::Add.precedence_key(1) > Operator::Power.precedence_key(0));
        assert!(Operator::Power.precedence_key(0) > Operator::Multiply.precedence_key(0));
    }

    #[test]
    fn test_form_detection() {
        let form = |s: &str| Form::of(&tokenize(s).unwrap());
        assert_eq!(form("x=1"), Form::Assignment);
        assert_eq!(form("f(x)=x"), Form::Declaration);
        assert_eq!(form("f(2)=x"), Form::Expression);
        assert_eq!(form("f(x+1)=x"), Form::Expression);
        assert_eq!(form("-x=1"), Form::Expression);
        assert_eq!(form("1+x"), Form::Expression);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_number_extreme_magnitudes() {
        assert_eq!(format_number(2f64.powi(70)), "1.1805916207174113e+21");
        assert_eq!(format_number(-1e21), "-1e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_large_assignment_message() {
        let mut evaluator = Evaluator::new();
        let outcome = evaluator.evaluate("x=2^70").unwrap();
        assert_eq!(
            outcome.message.as_deref(),
            Some("set x to 1.1805916207174113e+21")
        );
    }

    #[test]
    fn test_display_text() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("x=2").unwrap().display_text(), "set x to 2");
        assert_eq!(evaluator.evaluate("x*4").unwrap().display_text(), "8");
        assert_eq!(
            evaluator.evaluate("g(t)=t").unwrap().display_text(),
            "declared function g(t)"
        );
    }
}
