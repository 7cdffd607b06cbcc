//! Reads expressions back from the text produced by rendering [`Expr`].
//!
//! Grammar (lowest precedence first):
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := atom ('**' unary)?
//! atom    := number | name | name '(' name ')' | ('sin' | 'cos') '(' sum ')' | '(' sum ')'
//! ```
//! Powers must have integer exponents. Numeric constants must stay finite, also after
//! folding (`1e400`, `10**400` or `0**(-1)` are rejected). Column vectors are written as
//! `Matrix([[x], [y], [z]])`.

use nalgebra::Vector3;

use crate::expression::Expr;
use crate::kinematics_error::KinematicsError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleStar,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>, KinematicsError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '+' => { tokens.push(Token::Plus); i += 1; }
            '-' => { tokens.push(Token::Minus); i += 1; }
            '/' => { tokens.push(Token::Slash); i += 1; }
            '(' => { tokens.push(Token::LeftParen); i += 1; }
            ')' => { tokens.push(Token::RightParen); i += 1; }
            '[' => { tokens.push(Token::LeftBracket); i += 1; }
            ']' => { tokens.push(Token::RightBracket); i += 1; }
            ',' => { tokens.push(Token::Comma); i += 1; }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::DoubleStar);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Optional exponent, only if digits follow (otherwise 'e' starts a name)
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|e| {
                    KinematicsError::ParseError(format!("invalid number '{}': {}", literal, e))
                })?;
                tokens.push(Token::Number(value));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Identifier(chars[start..i].iter().collect()));
            }
            _ => {
                return Err(KinematicsError::ParseError(format!(
                    "unexpected character '{}' at position {}", c, i
                )));
            }
        }
    }
    Ok(tokens)
}

/// Rejects expressions where folding of constants overflowed to infinity or NaN. Such a
/// value would render as `inf` or `NaN` and read back as a symbol.
fn finite(expr: Expr) -> Result<Expr, KinematicsError> {
    if expr.is_finite() {
        Ok(expr)
    } else {
        Err(KinematicsError::ParseError(format!(
            "numeric constant out of range in {}", expr
        )))
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, KinematicsError> {
        Ok(Self { tokens: tokenize(text)?, position: 0 })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn accept(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), KinematicsError> {
        match self.next() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(KinematicsError::ParseError(format!(
                "expected {:?}, found {:?}", expected, token
            ))),
            None => Err(KinematicsError::ParseError(format!(
                "expected {:?}, found end of input", expected
            ))),
        }
    }

    fn expect_end(&self) -> Result<(), KinematicsError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(KinematicsError::ParseError(format!(
                "unexpected {:?} after the end of expression", token
            ))),
        }
    }

    fn sum(&mut self) -> Result<Expr, KinematicsError> {
        let mut terms = vec![self.product()?];
        loop {
            if self.accept(&Token::Plus) {
                terms.push(self.product()?);
            } else if self.accept(&Token::Minus) {
                terms.push(Expr::neg(self.product()?));
            } else {
                return finite(Expr::sum(terms));
            }
        }
    }

    fn product(&mut self) -> Result<Expr, KinematicsError> {
        let mut factors = vec![self.unary()?];
        loop {
            if self.accept(&Token::Star) {
                factors.push(self.unary()?);
            } else if self.accept(&Token::Slash) {
                let divisor = self.unary()?;
                match divisor.as_number() {
                    Some(value) if value == 0.0 => {
                        return Err(KinematicsError::ParseError("division by zero".to_string()));
                    }
                    Some(value) => factors.push(Expr::number(1.0 / value)),
                    None => factors.push(Expr::pow(divisor, -1)),
                }
            } else {
                return finite(Expr::product(factors));
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, KinematicsError> {
        if self.accept(&Token::Minus) {
            Ok(Expr::neg(self.unary()?))
        } else if self.accept(&Token::Plus) {
            self.unary()
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Expr, KinematicsError> {
        let base = self.atom()?;
        if !self.accept(&Token::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.unary()?;
        match exponent.as_number() {
            Some(value) if value.fract() == 0.0 && value.abs() <= i32::MAX as f64 => {
                finite(Expr::pow(base, value as i32))
            }
            _ => Err(KinematicsError::ParseError(format!(
                "only integer exponents are supported, found {}", exponent
            ))),
        }
    }

    fn atom(&mut self) -> Result<Expr, KinematicsError> {
        match self.next() {
            Some(Token::Number(value)) => finite(Expr::number(value)),
            Some(Token::LeftParen) => {
                let inner = self.sum()?;
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            Some(Token::Identifier(name)) => {
                if !self.accept(&Token::LeftParen) {
                    return match name.as_str() {
                        "sin" | "cos" | "Matrix" => Err(KinematicsError::ParseError(format!(
                            "{} must be followed by an argument", name
                        ))),
                        _ => Ok(Expr::symbol(name)),
                    };
                }
                match name.as_str() {
                    "sin" | "cos" => {
                        let argument = self.sum()?;
                        self.expect(&Token::RightParen)?;
                        Ok(if name == "sin" { Expr::sin(argument) } else { Expr::cos(argument) })
                    }
                    "Matrix" => Err(KinematicsError::ParseError(
                        "matrix is not allowed inside a scalar expression".to_string(),
                    )),
                    _ => match self.next() {
                        Some(Token::Identifier(argument)) => {
                            self.expect(&Token::RightParen)?;
                            Ok(Expr::function(name, argument))
                        }
                        other => Err(KinematicsError::ParseError(format!(
                            "coordinate {} must depend on a time variable, found {:?}", name, other
                        ))),
                    },
                }
            }
            Some(token) => Err(KinematicsError::ParseError(format!("unexpected {:?}", token))),
            None => Err(KinematicsError::ParseError("unexpected end of input".to_string())),
        }
    }

    fn column_vector(&mut self) -> Result<Vec<Expr>, KinematicsError> {
        match self.next() {
            Some(Token::Identifier(name)) if name == "Matrix" => {}
            other => {
                return Err(KinematicsError::ParseError(format!(
                    "expected Matrix, found {:?}", other
                )));
            }
        }
        self.expect(&Token::LeftParen)?;
        self.expect(&Token::LeftBracket)?;
        let mut rows = Vec::new();
        loop {
            self.expect(&Token::LeftBracket)?;
            rows.push(self.sum()?);
            self.expect(&Token::RightBracket)?;
            if !self.accept(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightBracket)?;
        self.expect(&Token::RightParen)?;
        Ok(rows)
    }
}

/// Parses a scalar expression.
pub fn parse_expression(text: &str) -> Result<Expr, KinematicsError> {
    let mut parser = Parser::new(text)?;
    let expr = parser.sum()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parses a column vector with three rows, as `Matrix([[x], [y], [z]])`.
pub fn parse_column_vector(text: &str) -> Result<Vector3<Expr>, KinematicsError> {
    let mut parser = Parser::new(text)?;
    let mut rows = parser.column_vector()?;
    parser.expect_end()?;
    if rows.len() != 3 {
        return Err(KinematicsError::MalformedInput { expected: 3, found: rows.len() });
    }
    let z = rows.remove(2);
    let y = rows.remove(1);
    let x = rows.remove(0);
    Ok(Vector3::new(x, y, z))
}
