//! Numeric expression engine: recursive-descent evaluation plus a linear
//! solver.
//!
//! Supports `+`, `-`, `*`, `/`, parentheses, unary negation, decimal numbers,
//! and (for the solver) a single free variable. `solve` treats `lhs = rhs`
//! as `lhs - rhs = 0` and finds the root of a linear expression by two-point
//! sampling; a third sample guards against silently "solving" a non-linear
//! input.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MathError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("expression is not linear in {0}")]
    NotLinear(String),

    #[error("no unique solution")]
    NoUniqueSolution,
}

/// Evaluates a constant expression (the "simplify" task).
pub fn evaluate(expr: &str) -> Result<f64, MathError> {
    evaluate_with(expr, None)
}

/// Solves `expr` for `var`, where `expr` is either `lhs = rhs` or an
/// expression implicitly equal to zero. The expression must be linear in
/// `var`.
pub fn solve_linear(expr: &str, var: &str) -> Result<f64, MathError> {
    let (lhs, rhs) = match expr.split_once('=') {
        Some((l, r)) => (l, r),
        None => (expr, "0"),
    };

    let f = |x: f64| -> Result<f64, MathError> {
        Ok(evaluate_with(lhs, Some((var, x)))? - evaluate_with(rhs, Some((var, x)))?)
    };

    let b = f(0.0)?;
    let a = f(1.0)? - b;

    if a == 0.0 {
        return Err(MathError::NoUniqueSolution);
    }

    // Linearity check: a third sample must land on the same line.
    let expected = 2.0 * a + b;
    let actual = f(2.0)?;
    let scale = expected.abs().max(actual.abs()).max(1.0);
    if (actual - expected).abs() > 1e-9 * scale {
        return Err(MathError::NotLinear(var.to_string()));
    }

    Ok(-b / a)
}

fn evaluate_with(expr: &str, var: Option<(&str, f64)>) -> Result<f64, MathError> {
    let tokens = tokenize(expr, var)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(MathError::Parse(format!(
            "unexpected token at position {}",
            parser.pos
        )));
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str, var: Option<(&str, f64)>) -> Result<Vec<Token>, MathError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| MathError::Parse(format!("invalid number: {num_str}")))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                match var {
                    Some((var_name, value)) if var_name == name => {
                        // Implicit multiplication like `2x` stays a parse
                        // error; the variable must stand alone.
                        tokens.push(Token::Number(value));
                    }
                    _ => return Err(MathError::UnknownSymbol(name)),
                }
            }
            c => return Err(MathError::Parse(format!("unexpected character: '{c}'"))),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, MathError> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<f64, MathError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    left /= right;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // unary = '-' unary | primary
    fn parse_unary(&mut self) -> Result<f64, MathError> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            let val = self.parse_unary()?;
            return Ok(-val);
        }
        self.parse_primary()
    }

    // primary = NUMBER | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, MathError> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err(MathError::Parse("expected ')'".into())),
                }
            }
            other => Err(MathError::Parse(format!("unexpected token: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_with_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("-(2 + 3)").unwrap(), -5.0);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(evaluate("1 / 0"), Err(MathError::DivisionByZero));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert!(matches!(evaluate("2 + y"), Err(MathError::UnknownSymbol(_))));
    }

    #[test]
    fn solves_linear_equations() {
        // 3x + 6 = 0 → x = -2
        assert_eq!(solve_linear("3 * x + 6", "x").unwrap(), -2.0);
        // 2x - 4 = 6 → x = 5
        assert_eq!(solve_linear("2 * x - 4 = 6", "x").unwrap(), 5.0);
    }

    #[test]
    fn nonlinear_input_is_rejected() {
        assert_eq!(
            solve_linear("x * x - 4", "x"),
            Err(MathError::NotLinear("x".into()))
        );
    }

    #[test]
    fn constant_equation_has_no_unique_solution() {
        assert_eq!(solve_linear("3 = 3", "x"), Err(MathError::NoUniqueSolution));
    }
}
