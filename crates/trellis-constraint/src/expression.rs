//! Variables, linear expressions and constraints.

use std::ops::{Add, Mul, Neg, Sub};

use smallvec::SmallVec;

use crate::strength::Strength;

/// Handle to an unknown owned by a [`Solver`](crate::Solver).
///
/// The wrapped index is the variable's creation order within its solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Creation index within the owning solver.
    pub fn index(self) -> usize {
        self.0
    }

    pub fn equal_to(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Expression::from(self).equal_to(rhs, strength)
    }

    pub fn less_or_equal(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Expression::from(self).less_or_equal(rhs, strength)
    }

    pub fn greater_or_equal(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Expression::from(self).greater_or_equal(rhs, strength)
    }
}

/// `coefficient * variable`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: Variable,
    pub coefficient: f64,
}

impl Term {
    pub fn new(variable: Variable, coefficient: f64) -> Self {
        Self { variable, coefficient }
    }
}

/// A linear expression in the form: constant + Σ(coefficient * variable)
///
/// Terms keep the order in which they were added. Expressions are values:
/// the arithmetic operators consume their operands and return a new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    terms: SmallVec<[Term; 4]>,
    constant: f64,
}

impl Expression {
    pub fn new(terms: impl IntoIterator<Item = Term>, constant: f64) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant,
        }
    }

    /// Create a constant expression.
    pub fn from_constant(value: f64) -> Self {
        Self {
            terms: SmallVec::new(),
            constant: value,
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Evaluate against the given variable values.
    pub fn value(&self, value_of: impl Fn(Variable) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, term| acc + term.coefficient * value_of(term.variable))
    }

    /// `self == rhs`
    pub fn equal_to(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::Equal, strength)
    }

    /// `self <= rhs`
    pub fn less_or_equal(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::LessOrEqual, strength)
    }

    /// `self >= rhs`
    pub fn greater_or_equal(self, rhs: impl Into<Expression>, strength: Strength) -> Constraint {
        Constraint::new(self - rhs.into(), Relation::GreaterOrEqual, strength)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::from_constant(value)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Expression::from(Term::new(variable, 1.0))
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        let mut terms = SmallVec::new();
        terms.push(term);
        Self { terms, constant: 0.0 }
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(self.variable, -self.coefficient)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self * -1.0
    }
}

impl Mul<f64> for Variable {
    type Output = Term;

    fn mul(self, coefficient: f64) -> Term {
        Term::new(self, coefficient)
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(mut self, scalar: f64) -> Expression {
        self.constant *= scalar;
        for term in &mut self.terms {
            term.coefficient *= scalar;
        }
        self
    }
}

impl<T: Into<Expression>> Add<T> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: T) -> Expression {
        let rhs = rhs.into();
        self.constant += rhs.constant;
        self.terms.extend(rhs.terms);
        self
    }
}

impl<T: Into<Expression>> Sub<T> for Expression {
    type Output = Expression;

    fn sub(self, rhs: T) -> Expression {
        self + -rhs.into()
    }
}

impl<T: Into<Expression>> Add<T> for Variable {
    type Output = Expression;

    fn add(self, rhs: T) -> Expression {
        Expression::from(self) + rhs
    }
}

impl<T: Into<Expression>> Sub<T> for Variable {
    type Output = Expression;

    fn sub(self, rhs: T) -> Expression {
        Expression::from(self) - rhs
    }
}

impl<T: Into<Expression>> Add<T> for Term {
    type Output = Expression;

    fn add(self, rhs: T) -> Expression {
        Expression::from(self) + rhs
    }
}

/// The relation of a constraint (equality or inequality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// `expression <relation> 0` at the given strength.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    expression: Expression,
    relation: Relation,
    strength: Strength,
}

impl Constraint {
    /// Create a new constraint. The right-hand side is the constant zero.
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self {
            expression,
            relation,
            strength: Strength::new(strength.value()),
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }
}
