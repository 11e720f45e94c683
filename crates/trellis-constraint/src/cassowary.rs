//! Cassowary constraint solver implementation.
//!
//! This is an implementation of the Cassowary linear arithmetic constraint
//! solving algorithm, as described in "The Cassowary Linear Arithmetic
//! Constraint Solving Algorithm" by Greg J. Badros and Alan Borning.
//!
//! Required constraints become hard rows of a simplex tableau. Every other
//! constraint gets error variables whose sum, weighted by strength, forms the
//! objective the solver minimizes. Tableau storage is keyed by symbols that
//! carry their creation index, and every pivot choice falls back to the lowest
//! index, so identical input always produces identical output.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use trellis_core::SolverError;

use crate::expression::{Constraint, Relation, Variable};
use crate::strength::Strength;

/// Tolerance for floating-point comparisons.
const EPSILON: f64 = 1e-8;

/// Near-zero check for floating point values.
fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Handle returned by [`Solver::add_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum SymbolKind {
    /// An external variable (the actual unknowns we're solving for)
    External,
    /// A slack variable (for inequality constraints)
    Slack,
    /// An error variable (for non-required constraints)
    Error,
    /// A dummy variable (for required equality constraints)
    Dummy,
}

/// Tableau column. Ordered by creation index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Symbol {
    id: usize,
    kind: SymbolKind,
}

impl Symbol {
    fn is_external(self) -> bool {
        self.kind == SymbolKind::External
    }

    fn is_error(self) -> bool {
        self.kind == SymbolKind::Error
    }

    fn is_dummy(self) -> bool {
        self.kind == SymbolKind::Dummy
    }

    fn is_pivotable(self) -> bool {
        matches!(self.kind, SymbolKind::Slack | SymbolKind::Error)
    }
}

/// Marker symbols recorded for each constraint so it can be removed again.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
    strength: Strength,
}

/// A row in the simplex tableau: `basic = constant + Σ(coefficient * symbol)`.
#[derive(Debug, Clone, Default)]
struct Row {
    constant: f64,
    cells: BTreeMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: BTreeMap::new(),
        }
    }

    /// Add `coefficient * symbol`, dropping the cell if it cancels out.
    fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let entry = self.cells.entry(symbol).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.cells.remove(&symbol);
        }
    }

    /// Add `coefficient * other`.
    fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &c) in &other.cells {
            self.insert_symbol(symbol, c * coefficient);
        }
    }

    fn remove(&mut self, symbol: Symbol) {
        self.cells.remove(&symbol);
    }

    fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for coefficient in self.cells.values_mut() {
            *coefficient = -*coefficient;
        }
    }

    fn coefficient(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Solve for a symbol in this row.
    ///
    /// The row `0 = constant + a*symbol + ...` becomes
    /// `symbol = -constant/a - ...`, with `symbol` left out of the cells.
    fn solve_for(&mut self, symbol: Symbol) {
        let coefficient = self.cells.remove(&symbol).unwrap_or(1.0);
        let multiplier = -1.0 / coefficient;
        self.constant *= multiplier;
        for c in self.cells.values_mut() {
            *c *= multiplier;
        }
    }

    /// Solve for `rhs` in a row whose basic symbol is `lhs`.
    fn solve_for_symbols(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    /// Substitute a symbol in this row with another row.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coefficient) = self.cells.remove(&symbol) {
            self.insert_row(row, coefficient);
        }
    }

    fn all_dummies(&self) -> bool {
        self.cells.keys().all(|symbol| symbol.is_dummy())
    }

    /// Lowest-index symbol eligible to enter the basis with a negative
    /// objective coefficient.
    fn entering_symbol(&self) -> Option<Symbol> {
        self.cells
            .iter()
            .find(|(symbol, &c)| !symbol.is_dummy() && c < 0.0)
            .map(|(&symbol, _)| symbol)
    }

    fn any_pivotable_symbol(&self) -> Option<Symbol> {
        self.cells.keys().copied().find(|symbol| symbol.is_pivotable())
    }
}

/// Which objective an optimization pass works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objective {
    Main,
    Artificial,
}

/// The Cassowary constraint solver.
///
/// A solver only ever grows within one layout computation; callers that
/// want a fresh system either build a new solver or call [`Solver::reset`].
#[derive(Debug, Default)]
pub struct Solver {
    /// Diagnostic names, indexed by variable
    names: Vec<String>,
    /// Values published by the last `update_variables`
    values: Vec<f64>,
    /// External symbol for each variable that appears in a constraint
    var_symbols: IndexMap<Variable, Symbol>,
    /// Marker symbols for each live constraint
    constraints: IndexMap<ConstraintId, Tag>,
    /// The tableau rows, keyed by their basic symbol
    rows: IndexMap<Symbol, Row>,
    /// The objective function row
    objective: Row,
    /// Artificial objective used while adding a row without a subject
    artificial: Option<Row>,
    symbol_counter: usize,
    constraint_counter: usize,
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new variable.
    pub fn new_variable(&mut self, name: impl Into<String>) -> Variable {
        let var = Variable(self.names.len());
        self.names.push(name.into());
        self.values.push(0.0);
        var
    }

    /// Name the variable was created with.
    pub fn variable_name(&self, var: Variable) -> Option<&str> {
        self.names.get(var.0).map(String::as_str)
    }

    /// Value of the variable as of the last [`Solver::update_variables`].
    pub fn value_of(&self, var: Variable) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    /// Re-derive every variable value from the current basis.
    pub fn update_variables(&mut self) {
        for (var, symbol) in &self.var_symbols {
            let value = self.rows.get(symbol).map_or(0.0, |row| row.constant);
            if let Some(slot) = self.values.get_mut(var.0) {
                *slot = value;
            }
        }
    }

    pub fn has_constraint(&self, id: ConstraintId) -> bool {
        self.constraints.contains_key(&id)
    }

    /// Number of constraints currently in the system.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Drop every constraint, row and variable.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add a constraint to the solver.
    ///
    /// Fails only when the constraint is required and cannot hold together
    /// with the required constraints already present.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, SolverError> {
        let (mut row, tag) = self.create_row(&constraint);
        let mut subject = choose_subject(&row, &tag);

        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant) {
                tracing::debug!(constant = row.constant, "required constraint contradicts the system");
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                if !self.add_with_artificial_variable(row)? {
                    tracing::debug!("artificial variable could not be driven to zero");
                    return Err(SolverError::UnsatisfiableConstraint);
                }
            }
        }

        let id = ConstraintId(self.constraint_counter);
        self.constraint_counter += 1;
        self.constraints.insert(id, tag);

        self.optimize(Objective::Main)?;
        Ok(id)
    }

    /// Remove a constraint from the solver.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), SolverError> {
        let tag = self
            .constraints
            .shift_remove(&id)
            .ok_or(SolverError::UnknownConstraint)?;

        self.remove_constraint_effects(&tag);

        if self.rows.shift_remove(&tag.marker).is_none() {
            // The marker is not basic - pivot it into the basis first
            let (leaving, mut row) = self
                .marker_leaving_row(tag.marker)
                .ok_or(SolverError::InternalError("no leaving row for constraint marker"))?;
            row.solve_for_symbols(leaving, tag.marker);
            self.substitute(tag.marker, &row);
        }

        self.optimize(Objective::Main)
    }

    /// Create a row for a constraint.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let expression = constraint.expression();
        let strength = constraint.strength();
        let mut row = Row::new(expression.constant());

        // Add the terms to the row, substituting basic variables
        for term in expression.terms() {
            if near_zero(term.coefficient) {
                continue;
            }
            let symbol = self.symbol_for(term.variable);
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, term.coefficient),
                None => row.insert_symbol(symbol, term.coefficient),
            }
        }

        let tag = match constraint.relation() {
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let coefficient = if constraint.relation() == Relation::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let slack = self.new_symbol(SymbolKind::Slack);
                row.insert_symbol(slack, coefficient);

                let other = if strength.is_required() {
                    None
                } else {
                    let error = self.new_symbol(SymbolKind::Error);
                    row.insert_symbol(error, -coefficient);
                    self.objective.insert_symbol(error, strength.value());
                    Some(error)
                };
                Tag { marker: slack, other, strength }
            }
            Relation::Equal if strength.is_required() => {
                let dummy = self.new_symbol(SymbolKind::Dummy);
                row.insert_symbol(dummy, 1.0);
                Tag { marker: dummy, other: None, strength }
            }
            Relation::Equal => {
                let plus = self.new_symbol(SymbolKind::Error);
                let minus = self.new_symbol(SymbolKind::Error);
                row.insert_symbol(plus, -1.0);
                row.insert_symbol(minus, 1.0);
                self.objective.insert_symbol(plus, strength.value());
                self.objective.insert_symbol(minus, strength.value());
                Tag { marker: plus, other: Some(minus), strength }
            }
        };

        // Ensure the constant is non-negative
        if row.constant < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    fn symbol_for(&mut self, var: Variable) -> Symbol {
        if let Some(&symbol) = self.var_symbols.get(&var) {
            return symbol;
        }
        let symbol = self.new_symbol(SymbolKind::External);
        self.var_symbols.insert(var, symbol);
        symbol
    }

    /// Generate a new symbol.
    fn new_symbol(&mut self, kind: SymbolKind) -> Symbol {
        let id = self.symbol_counter;
        self.symbol_counter += 1;
        Symbol { id, kind }
    }

    /// Add a row that has no valid subject by minimizing an artificial
    /// variable standing in for it.
    ///
    /// Returns whether the artificial variable reached zero, i.e. whether the
    /// row is satisfiable.
    fn add_with_artificial_variable(&mut self, row: Row) -> Result<bool, SolverError> {
        let art = self.new_symbol(SymbolKind::Slack);
        self.rows.insert(art, row.clone());
        self.artificial = Some(row);

        self.optimize(Objective::Artificial)?;
        let success = self
            .artificial
            .take()
            .map_or(true, |artificial| near_zero(artificial.constant));

        // Remove the artificial variable from the tableau
        if let Some(mut art_row) = self.rows.shift_remove(&art) {
            if art_row.cells.is_empty() {
                return Ok(success);
            }
            let Some(entering) = art_row.any_pivotable_symbol() else {
                return Ok(false);
            };
            art_row.solve_for_symbols(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    /// Substitute a symbol throughout the tableau.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for basic in self.rows.values_mut() {
            basic.substitute(symbol, row);
        }
        self.objective.substitute(symbol, row);
        if let Some(artificial) = self.artificial.as_mut() {
            artificial.substitute(symbol, row);
        }
    }

    /// Optimize the objective function using the simplex algorithm.
    fn optimize(&mut self, which: Objective) -> Result<(), SolverError> {
        loop {
            let objective = match which {
                Objective::Main => &self.objective,
                Objective::Artificial => match self.artificial.as_ref() {
                    Some(artificial) => artificial,
                    None => return Ok(()),
                },
            };

            let Some(entering) = objective.entering_symbol() else {
                return Ok(()); // Optimal
            };

            let Some((leaving, mut row)) = self.find_leaving_row(entering) else {
                return Err(SolverError::InternalError("unbounded objective"));
            };

            tracing::trace!(entering = entering.id, leaving = leaving.id, "pivot");
            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// Find the row to leave the basis (minimum ratio test).
    fn find_leaving_row(&mut self, entering: Symbol) -> Option<(Symbol, Row)> {
        let mut best: Option<(f64, Symbol)> = None;

        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }
            let coefficient = row.coefficient(entering);
            if coefficient < 0.0 {
                let ratio = -row.constant / coefficient;
                let better = match best {
                    None => true,
                    Some((best_ratio, best_symbol)) => {
                        ratio < best_ratio || (ratio == best_ratio && symbol < best_symbol)
                    }
                };
                if better {
                    best = Some((ratio, symbol));
                }
            }
        }

        let (_, leaving) = best?;
        let row = self.rows.shift_remove(&leaving)?;
        Some((leaving, row))
    }

    /// Find the row to pivot a non-basic constraint marker into the basis.
    ///
    /// Prefers a restricted row with a negative coefficient, then a
    /// restricted row with a positive one, and falls back to an external row.
    fn marker_leaving_row(&mut self, marker: Symbol) -> Option<(Symbol, Row)> {
        let mut negative: Option<(f64, Symbol)> = None;
        let mut positive: Option<(f64, Symbol)> = None;
        let mut external: Option<Symbol> = None;

        for (&symbol, row) in &self.rows {
            let coefficient = row.coefficient(marker);
            if coefficient == 0.0 {
                continue;
            }
            if symbol.is_external() {
                external.get_or_insert(symbol);
                continue;
            }
            let (slot, ratio) = if coefficient < 0.0 {
                (&mut negative, -row.constant / coefficient)
            } else {
                (&mut positive, row.constant / coefficient)
            };
            let better = match *slot {
                None => true,
                Some((best_ratio, best_symbol)) => {
                    ratio < best_ratio || (ratio == best_ratio && symbol < best_symbol)
                }
            };
            if better {
                *slot = Some((ratio, symbol));
            }
        }

        let leaving = negative
            .or(positive)
            .map(|(_, symbol)| symbol)
            .or(external)?;
        let row = self.rows.shift_remove(&leaving)?;
        Some((leaving, row))
    }

    /// Remove a constraint's error terms from the objective.
    fn remove_constraint_effects(&mut self, tag: &Tag) {
        let markers = std::iter::once(tag.marker).chain(tag.other);
        for marker in markers.filter(|symbol| symbol.is_error()) {
            match self.rows.get(&marker) {
                Some(row) => self.objective.insert_row(row, -tag.strength.value()),
                None => self.objective.insert_symbol(marker, -tag.strength.value()),
            }
        }
    }
}

/// Choose a subject (basic variable) for a new row.
fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
    if let Some(&symbol) = row.cells.keys().find(|symbol| symbol.is_external()) {
        return Some(symbol);
    }

    std::iter::once(tag.marker)
        .chain(tag.other)
        .find(|&symbol| symbol.is_pivotable() && row.coefficient(symbol) < 0.0)
}
