//! Algebra backends used by the kinematics.
//!
//! Rotations and the kinematic chain are written against the [`Algebra`] trait and never
//! touch a concrete scalar type. [`SymbolicAlgebra`] builds [`Expr`] trees, which is what the
//! derivation binary renders. [`NumericAlgebra`] computes plain `f64` values from
//! [`Bindings`] and serves to cross-check the symbolic results.

use std::collections::HashMap;

use nalgebra::{Matrix3, Scalar, Vector3};

use crate::expression::Expr;
use crate::kinematics_error::KinematicsError;

/// Time variable that generalized coordinates depend on. It is passed explicitly to every
/// coordinate constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeVariable {
    pub name: String,
}

impl TimeVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Numeric values for named symbols and generalized coordinates.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, f64>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style binding of the name to the value.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Result<f64, KinematicsError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| KinematicsError::UndefinedSymbol(name.to_string()))
    }
}

/// Capability to create scalars and combine them. Matrix and vector operations are provided
/// on top of the scalar operations.
pub trait Algebra {
    type Scalar: Scalar;

    fn constant(&self, value: f64) -> Self::Scalar;

    /// Named constant parameter (link length and the like).
    fn symbol(&self, name: &str) -> Result<Self::Scalar, KinematicsError>;

    /// Generalized coordinate, a function of the given time variable.
    fn coordinate(&self, name: &str, time: &TimeVariable) -> Result<Self::Scalar, KinematicsError>;

    fn add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn sub(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn mul(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn neg(&self, a: &Self::Scalar) -> Self::Scalar;
    fn square(&self, a: &Self::Scalar) -> Self::Scalar;
    fn sin(&self, a: &Self::Scalar) -> Self::Scalar;
    fn cos(&self, a: &Self::Scalar) -> Self::Scalar;

    /// Human-readable text of the scalar.
    fn render(&self, a: &Self::Scalar) -> String;

    fn zero(&self) -> Self::Scalar {
        self.constant(0.0)
    }

    fn one(&self) -> Self::Scalar {
        self.constant(1.0)
    }

    fn vector(&self, x: Self::Scalar, y: Self::Scalar, z: Self::Scalar) -> Vector3<Self::Scalar> {
        Vector3::new(x, y, z)
    }

    /// Matrix product. Not used by the chain composition, which never forms R1 * R2.
    fn matrix_mul(&self, a: &Matrix3<Self::Scalar>, b: &Matrix3<Self::Scalar>) -> Matrix3<Self::Scalar> {
        Matrix3::from_fn(|r, c| {
            let first = self.mul(&a[(r, 0)], &b[(0, c)]);
            (1..3).fold(first, |acc, k| self.add(&acc, &self.mul(&a[(r, k)], &b[(k, c)])))
        })
    }

    /// Applies the matrix to the column vector.
    fn transform(&self, m: &Matrix3<Self::Scalar>, v: &Vector3<Self::Scalar>) -> Vector3<Self::Scalar> {
        Vector3::from_fn(|r, _| {
            let first = self.mul(&m[(r, 0)], &v[0]);
            (1..3).fold(first, |acc, k| self.add(&acc, &self.mul(&m[(r, k)], &v[k])))
        })
    }

    fn vector_add(&self, a: &Vector3<Self::Scalar>, b: &Vector3<Self::Scalar>) -> Vector3<Self::Scalar> {
        Vector3::from_fn(|r, _| self.add(&a[r], &b[r]))
    }

    /// Renders the column vector as `Matrix([[x], [y], [z]])`.
    fn render_vector(&self, v: &Vector3<Self::Scalar>) -> String {
        let rows: Vec<String> = v.iter().map(|e| format!("[{}]", self.render(e))).collect();
        format!("Matrix([{}])", rows.join(", "))
    }
}

/// Builds symbolic expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicAlgebra;

impl Algebra for SymbolicAlgebra {
    type Scalar = Expr;

    fn constant(&self, value: f64) -> Expr {
        Expr::number(value)
    }

    fn symbol(&self, name: &str) -> Result<Expr, KinematicsError> {
        Ok(Expr::symbol(name))
    }

    fn coordinate(&self, name: &str, time: &TimeVariable) -> Result<Expr, KinematicsError> {
        Ok(Expr::function(name, time.name.as_str()))
    }

    fn add(&self, a: &Expr, b: &Expr) -> Expr {
        Expr::sum([a.clone(), b.clone()])
    }

    fn sub(&self, a: &Expr, b: &Expr) -> Expr {
        Expr::sub(a.clone(), b.clone())
    }

    fn mul(&self, a: &Expr, b: &Expr) -> Expr {
        Expr::product([a.clone(), b.clone()])
    }

    fn neg(&self, a: &Expr) -> Expr {
        Expr::neg(a.clone())
    }

    fn square(&self, a: &Expr) -> Expr {
        Expr::pow(a.clone(), 2)
    }

    fn sin(&self, a: &Expr) -> Expr {
        Expr::sin(a.clone())
    }

    fn cos(&self, a: &Expr) -> Expr {
        Expr::cos(a.clone())
    }

    fn render(&self, a: &Expr) -> String {
        a.to_string()
    }
}

/// Computes numbers, taking the values of symbols and coordinates from the bindings.
/// A name without binding fails at the moment it is first requested.
#[derive(Debug, Clone, Default)]
pub struct NumericAlgebra {
    pub bindings: Bindings,
}

impl NumericAlgebra {
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }
}

impl Algebra for NumericAlgebra {
    type Scalar = f64;

    fn constant(&self, value: f64) -> f64 {
        value
    }

    fn symbol(&self, name: &str) -> Result<f64, KinematicsError> {
        self.bindings.get(name)
    }

    fn coordinate(&self, name: &str, _time: &TimeVariable) -> Result<f64, KinematicsError> {
        self.bindings.get(name)
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn sub(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    fn neg(&self, a: &f64) -> f64 {
        -a
    }

    fn square(&self, a: &f64) -> f64 {
        a * a
    }

    fn sin(&self, a: &f64) -> f64 {
        a.sin()
    }

    fn cos(&self, a: &f64) -> f64 {
        a.cos()
    }

    fn render(&self, a: &f64) -> String {
        a.to_string()
    }
}

/// Substitutes numeric values into every entry of the symbolic matrix.
pub fn evaluate_matrix(m: &Matrix3<Expr>, bindings: &Bindings) -> Result<Matrix3<f64>, KinematicsError> {
    let mut result = Matrix3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            result[(r, c)] = m[(r, c)].evaluate(bindings)?;
        }
    }
    Ok(result)
}

/// Substitutes numeric values into every entry of the symbolic vector.
pub fn evaluate_vector(v: &Vector3<Expr>, bindings: &Bindings) -> Result<Vector3<f64>, KinematicsError> {
    Ok(Vector3::new(
        v[0].evaluate(bindings)?,
        v[1].evaluate(bindings)?,
        v[2].evaluate(bindings)?,
    ))
}
