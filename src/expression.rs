//! Symbolic scalar expressions.
//!
//! [`Expr`] is a small expression tree that is enough to describe the center of mass positions
//! of the arm: named constants, generalized coordinates that depend on time, sums, products,
//! integer powers, sine and cosine. The constructors only do structural housekeeping
//! (flattening, folding numeric constants, dropping neutral elements). No algebraic
//! simplification is attempted, so the rendered text follows the structure of the formulas
//! it has been built from.
//!
//! ```
//! use rs_com_kinematics::expression::Expr;
//!
//! let lg1 = Expr::symbol("lg1");
//! let qy = Expr::function("q1y", "t");
//! let term = Expr::product([Expr::number(2.0), Expr::pow(qy, 2), lg1]);
//! assert_eq!(term.to_string(), "2*q1y(t)**2*lg1");
//! ```

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Zero};

use crate::algebra::Bindings;
use crate::kinematics_error::KinematicsError;

/// Symbolic scalar. Two expressions are equal if they have the same structure; symbols
/// are identified only by their names.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    /// Generalized coordinate, a function of the time variable named by `argument`.
    Function { name: String, argument: String },
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Power(Box<Expr>, i32),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
}

impl Expr {
    pub fn number(value: f64) -> Self {
        // Normalize -0.0 so it never renders as "-0"
        if value == 0.0 {
            Expr::Number(0.0)
        } else {
            Expr::Number(value)
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn function(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Expr::Function { name: name.into(), argument: argument.into() }
    }

    /// Sum of the given terms. Nested sums are flattened and numeric terms are folded into
    /// a single constant that is placed first.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut constant = 0.0;
        let mut flat = Vec::new();
        for term in terms {
            collect_terms(term, &mut constant, &mut flat);
        }
        if constant != 0.0 {
            flat.insert(0, Expr::Number(constant));
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.remove(0),
            _ => Expr::Sum(flat),
        }
    }

    /// Product of the given factors. Nested products are flattened, numeric factors are
    /// folded into a leading coefficient and any zero factor makes the whole product zero.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut coefficient = 1.0;
        let mut flat = Vec::new();
        for factor in factors {
            collect_factors(factor, &mut coefficient, &mut flat);
        }
        if coefficient == 0.0 {
            return Expr::zero();
        }
        if coefficient != 1.0 || flat.is_empty() {
            flat.insert(0, Expr::Number(coefficient));
        }
        match flat.len() {
            1 => flat.remove(0),
            _ => Expr::Product(flat),
        }
    }

    pub fn neg(value: Expr) -> Self {
        Expr::product([Expr::Number(-1.0), value])
    }

    pub fn sub(minuend: Expr, subtrahend: Expr) -> Self {
        Expr::sum([minuend, Expr::neg(subtrahend)])
    }

    /// Integer power. A power of a power is merged into one exponent unless the product of
    /// the exponents does not fit into `i32`, then the nesting is kept.
    pub fn pow(base: Expr, exponent: i32) -> Self {
        match (base, exponent) {
            (_, 0) => Expr::one(),
            (base, 1) => base,
            (Expr::Number(value), exponent) => Expr::number(value.powi(exponent)),
            (Expr::Power(inner, e), exponent) => match e.checked_mul(exponent) {
                Some(merged) => Expr::pow(*inner, merged),
                None => Expr::Power(Box::new(Expr::Power(inner, e)), exponent),
            },
            (base, exponent) => Expr::Power(Box::new(base), exponent),
        }
    }

    pub fn sin(argument: Expr) -> Self {
        match argument {
            Expr::Number(value) => Expr::number(value.sin()),
            argument => Expr::Sin(Box::new(argument)),
        }
    }

    pub fn cos(argument: Expr) -> Self {
        match argument {
            Expr::Number(value) => Expr::number(value.cos()),
            argument => Expr::Cos(Box::new(argument)),
        }
    }

    /// Checks that every numeric constant in the expression is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Expr::Number(value) => value.is_finite(),
            Expr::Symbol(_) | Expr::Function { .. } => true,
            Expr::Sum(items) | Expr::Product(items) => items.iter().all(Expr::is_finite),
            Expr::Power(base, _) => base.is_finite(),
            Expr::Sin(argument) | Expr::Cos(argument) => argument.is_finite(),
        }
    }

    /// Value of the expression if it is a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Checks if the symbol or generalized coordinate with the given name occurs anywhere
    /// in the expression.
    pub fn depends_on(&self, name: &str) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Symbol(symbol) => symbol == name,
            Expr::Function { name: function, argument } => function == name || argument == name,
            Expr::Sum(items) | Expr::Product(items) => items.iter().any(|e| e.depends_on(name)),
            Expr::Power(base, _) => base.depends_on(name),
            Expr::Sin(argument) | Expr::Cos(argument) => argument.depends_on(name),
        }
    }

    /// Substitutes numeric values for all symbols and generalized coordinates and computes
    /// the result. Coordinates are looked up by their own name (the value at the time
    /// instant of interest).
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, KinematicsError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Symbol(name) => bindings.get(name),
            Expr::Function { name, .. } => bindings.get(name),
            Expr::Sum(terms) => terms.iter().map(|t| t.evaluate(bindings)).sum(),
            Expr::Product(factors) => factors.iter().map(|f| f.evaluate(bindings)).product(),
            Expr::Power(base, exponent) => Ok(base.evaluate(bindings)?.powi(*exponent)),
            Expr::Sin(argument) => Ok(argument.evaluate(bindings)?.sin()),
            Expr::Cos(argument) => Ok(argument.evaluate(bindings)?.cos()),
        }
    }

    /// If this term carries a negative sign (negative number or negative leading
    /// coefficient), returns the term with the sign removed.
    fn without_minus(&self) -> Option<Expr> {
        match self {
            Expr::Number(value) if *value < 0.0 => Some(Expr::number(-value)),
            Expr::Product(factors) => match factors.split_first() {
                Some((Expr::Number(c), rest)) if *c < 0.0 => Some(Expr::product(
                    std::iter::once(Expr::Number(-c)).chain(rest.iter().cloned()),
                )),
                _ => None,
            },
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Sum(_) => 1,
            Expr::Product(_) => 2,
            Expr::Number(value) if *value < 0.0 => 2,
            Expr::Power(_, _) => 3,
            _ => 4,
        }
    }
}

fn collect_terms(term: Expr, constant: &mut f64, flat: &mut Vec<Expr>) {
    match term {
        Expr::Number(value) => *constant += value,
        Expr::Sum(inner) => {
            for t in inner {
                collect_terms(t, constant, flat);
            }
        }
        other => flat.push(other),
    }
}

fn collect_factors(factor: Expr, coefficient: &mut f64, flat: &mut Vec<Expr>) {
    match factor {
        Expr::Number(value) => *coefficient *= value,
        Expr::Product(inner) => {
            for f in inner {
                collect_factors(f, coefficient, flat);
            }
        }
        other => flat.push(other),
    }
}

/// Writes the factor, in parentheses if it binds weaker than the surrounding operator.
fn write_operand(f: &mut fmt::Formatter, operand: &Expr, parenthesize_below: u8) -> fmt::Result {
    if operand.precedence() < parenthesize_below {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Function { name, argument } => write!(f, "{}({})", name, argument),
            Expr::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.without_minus()) {
                        (0, _) => write!(f, "{}", term)?,
                        (_, Some(positive)) => {
                            write!(f, " - ")?;
                            write_operand(f, &positive, 2)?;
                        }
                        (_, None) => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            }
            Expr::Product(factors) => {
                let factors = match factors.split_first() {
                    Some((Expr::Number(c), rest)) if *c == -1.0 && !rest.is_empty() => {
                        write!(f, "-")?;
                        rest
                    }
                    _ => factors.as_slice(),
                };
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    if i == 0 && matches!(factor, Expr::Number(_)) {
                        write!(f, "{}", factor)?;
                    } else {
                        write_operand(f, factor, 3)?;
                    }
                }
                Ok(())
            }
            Expr::Power(base, exponent) => {
                write_operand(f, base, 4)?;
                if *exponent < 0 {
                    write!(f, "**({})", exponent)
                } else {
                    write!(f, "**{}", exponent)
                }
            }
            Expr::Sin(argument) => write!(f, "sin({})", argument),
            Expr::Cos(argument) => write!(f, "cos({})", argument),
        }
    }
}

impl Zero for Expr {
    fn zero() -> Self {
        Expr::Number(0.0)
    }

    fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(value) if *value == 0.0)
    }
}

impl One for Expr {
    fn one() -> Self {
        Expr::Number(1.0)
    }
}

// Operator sugar for building expressions by hand. The chain composition goes through
// the `Algebra` trait and does not use these.
impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sub(self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::neg(self)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::number(value)
    }
}
