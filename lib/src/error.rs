//! Error types of the formula parser, the equation parser and the balancers.

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Side of a chemical equation
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    /// Left-hand side (before the arrow)
    Reactants,
    /// Right-hand side (after the arrow)
    Products,
}
impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Reactants => write!(f, "reactant"),
            Side::Products => write!(f, "product"),
        }
    }
}

/// Errors that can occur while parsing a chemical formula
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormulaError {
    /// Formula is empty (or only whitespace)
    #[error("formula is empty")]
    Empty,
    /// Formula is longer than the configured limit
    #[error("formula is too long ({length} characters, maximum is {max})")]
    TooLong { length: usize, max: usize },
    /// Formula contains a character that is not part of the formula grammar
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    /// Opening and closing parentheses don't match
    #[error("unmatched parentheses")]
    UnbalancedParentheses,
    /// Token that can't appear at this point of the formula
    #[error("unexpected token at position {position}")]
    UnexpectedToken { position: usize },
    /// Parenthesized group without any element
    #[error("empty group '()'")]
    EmptyGroup,
    /// Symbol that is not a known element
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    /// Atom count or group multiplier is zero or larger than allowed
    #[error("count {count} is out of range (1..={max})")]
    CountOutOfRange { count: u64, max: u32 },
    /// Sum of all atoms in the molecule is larger than allowed
    #[error("molecule has too many atoms ({total}, maximum is {max})")]
    TooManyAtoms { total: u64, max: u32 },
}
impl FormulaError {
    /// Stable tag of the error category
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::Empty => "EMPTY_FORMULA",
            FormulaError::TooLong { .. } => "FORMULA_TOO_LONG",
            FormulaError::InvalidCharacter { .. }
            | FormulaError::UnbalancedParentheses
            | FormulaError::UnexpectedToken { .. }
            | FormulaError::EmptyGroup => "INVALID_SYNTAX",
            FormulaError::UnknownElement(_) => "UNKNOWN_ELEMENT",
            FormulaError::CountOutOfRange { .. } | FormulaError::TooManyAtoms { .. } => "ATOM_COUNT_OUT_OF_RANGE",
        }
    }

    /// Returns true for errors caused by malformed formula structure
    pub fn is_syntax_error(&self) -> bool {
        self.code() == "INVALID_SYNTAX"
    }
}

/// Errors that can occur while splitting an equation into compounds
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EquationError {
    /// No reaction arrow was found
    #[error("equation has no reaction arrow (use →, -> or =)")]
    MissingArrow,
    /// More than one reaction arrow was found
    #[error("equation must contain exactly one reaction arrow, found {0}")]
    MultipleArrows(usize),
    /// One side of the equation has no compounds
    #[error("{0} side of the equation is empty")]
    EmptySide(Side),
    /// Coefficient written in front of a compound is invalid
    #[error("invalid coefficient in {side} term '{term}' (must be 1..={max})")]
    InvalidCoefficient { side: Side, term: String, max: u64 },
    /// Formula of a compound failed to parse
    #[error("invalid {side} formula '{formula}': {source}")]
    Compound {
        side: Side,
        formula: String,
        #[source]
        source: FormulaError,
    },
}

/// Errors of exact fraction arithmetic
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum FractionError {
    /// Fraction was constructed with a zero denominator
    #[error("denominator must not be zero")]
    ZeroDenominator,
    /// Division by a zero fraction
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors that can occur while balancing an equation
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BalanceError {
    /// Equation could not be parsed
    #[error(transparent)]
    Equation(#[from] EquationError),
    /// Trial-and-error search ran out of combinations or iterations
    #[error("no solution found after trying {tried} coefficient combinations")]
    SearchExhausted { tried: u64 },
    /// Stoichiometric matrix has full column rank, only the trivial solution exists
    #[error("overdetermined system: rank {rank} equals the number of compounds ({compounds})")]
    Overdetermined { rank: usize, compounds: usize },
    /// Compound contains an element that is missing from the element set
    #[error("element '{0}' is missing from the element set")]
    MissingElement(String),
    /// Solution vector contains a zero or negative coefficient
    #[error("degenerate solution: coefficient of '{formula}' is not positive")]
    NonPositiveCoefficient { formula: String },
    /// Coefficient doesn't fit into a machine integer
    #[error("coefficient of '{formula}' is too large")]
    CoefficientOverflow { formula: String },
    /// Final conservation check failed
    #[error("element {element} is not conserved ({reactants} on reactant side, {products} on product side)")]
    Unbalanced { element: String, reactants: u128, products: u128 },
    /// Exact arithmetic failed
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] FractionError),
}

/// Errors of loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration is not valid JSON
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration has an unusable value
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
