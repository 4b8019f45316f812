//! Balancing of chemical equations.
//!
//! Two methods are available:
//! * [`BalanceMethod::TrialAndError`] - bounded brute-force search over small coefficients
//! * [`BalanceMethod::Algebraic`] - null space of the stoichiometric matrix, computed with exact fractions
//!
//! Both return a [`BalanceResult`] that is never an `Err`: failures are reported through
//! [`BalanceResult::is_valid`] and [`BalanceResult::error`], with the partial step trace kept.

pub mod algebraic;
pub mod trial;

use crate::config::BalancerConfig;
use crate::elements::{ElementLookup, PeriodicTable};
use crate::equation::{parse_equation, ChemicalEquation, EquationCompound, ParsedEquation};
use crate::error::{BalanceError, EquationError, FormulaError};
use crate::formula::{molar_mass, parse_chemical_formula_with, parse_formula, ParsedFormula};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Method used to balance an equation
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceMethod {
    /// Odometer search over coefficients `1..=trial_max_coefficient`
    #[default]
    TrialAndError,
    /// Gaussian elimination over exact fractions
    Algebraic,
}
impl Display for BalanceMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceMethod::TrialAndError => write!(f, "trial-and-error"),
            BalanceMethod::Algebraic => write!(f, "algebraic"),
        }
    }
}
impl FromStr for BalanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trial-and-error" | "trial" => Ok(BalanceMethod::TrialAndError),
            "algebraic" => Ok(BalanceMethod::Algebraic),
            other => Err(format!("unknown balancing method '{}' (use trial-and-error or algebraic)", other)),
        }
    }
}

/// Equation to balance and the method to use
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub equation: String,
    #[serde(default)]
    pub method: BalanceMethod,
}
impl BalanceRequest {
    /// Request with the default method (trial-and-error)
    pub fn new(equation: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
            method: BalanceMethod::default(),
        }
    }

    pub fn with_method(mut self, method: BalanceMethod) -> Self {
        self.method = method;
        self
    }
}

/// Stage at which balancing failed
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Equation could not be parsed
    Parse,
    /// Equation was parsed but no valid coefficients were found
    Balance,
}

/// Outcome of one balancing attempt
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    /// Equation string as given
    pub original_equation: String,
    /// Reactants with their balanced coefficients (empty on failure)
    pub balanced_reactants: Vec<EquationCompound>,
    /// Products with their balanced coefficients (empty on failure)
    pub balanced_products: Vec<EquationCompound>,
    /// Formatted balanced equation (empty on failure)
    pub balanced_equation: String,
    pub method: BalanceMethod,
    /// Human-readable trace of what the balancer did
    pub steps: Vec<String>,
    pub is_valid: bool,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
}
impl BalanceResult {
    fn success(original_equation: &str, method: BalanceMethod, balanced: ChemicalEquation, steps: Vec<String>) -> Self {
        Self {
            original_equation: original_equation.to_string(),
            balanced_equation: balanced.to_string(),
            balanced_reactants: balanced.reactants,
            balanced_products: balanced.products,
            method,
            steps,
            is_valid: true,
            error: None,
            failure: None,
        }
    }

    fn failure(original_equation: &str, method: BalanceMethod, error: &BalanceError, steps: Vec<String>) -> Self {
        let failure = match error {
            BalanceError::Equation(_) => FailureKind::Parse,
            _ => FailureKind::Balance,
        };
        Self {
            original_equation: original_equation.to_string(),
            balanced_reactants: Vec::new(),
            balanced_products: Vec::new(),
            balanced_equation: String::new(),
            method,
            steps,
            is_valid: false,
            error: Some(error.to_string()),
            failure: Some(failure),
        }
    }

    /// Balanced coefficients, reactants first
    pub fn coefficients(&self) -> Vec<u64> {
        self.balanced_reactants
            .iter()
            .chain(self.balanced_products.iter())
            .map(|c| c.coefficient)
            .collect()
    }
}

/// Parser and balancer bound to an element lookup and a set of limits
/// # Example
/// ```
/// use chembalance::{BalanceMethod, BalanceRequest, Balancer};
///
/// let balancer = Balancer::default();
/// let request = BalanceRequest::new("Fe + O2 = Fe2O3").with_method(BalanceMethod::Algebraic);
/// let result = balancer.balance(&request);
///
/// assert!(result.is_valid);
/// assert_eq!(result.balanced_equation, "4Fe + 3O2 → 2Fe2O3");
/// ```
#[derive(Clone, Debug)]
pub struct Balancer<L = PeriodicTable> {
    lookup: L,
    config: BalancerConfig,
}
impl Balancer<PeriodicTable> {
    /// Balancer with the built-in periodic table
    pub fn new(config: BalancerConfig) -> Self {
        Self::with_lookup(PeriodicTable::new(), config)
    }
}
impl Default for Balancer<PeriodicTable> {
    fn default() -> Self {
        Self::new(BalancerConfig::default())
    }
}
impl<L: ElementLookup> Balancer<L> {
    /// Balancer with a custom element lookup
    pub fn with_lookup(lookup: L, config: BalancerConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Parses a chemical formula, never fails (errors are stored in the result)
    pub fn parse_formula(&self, formula: &str) -> ParsedFormula {
        parse_chemical_formula_with(formula, &self.lookup, &self.config)
    }

    /// Molar mass of a formula in g/mol
    pub fn molar_mass(&self, formula: &str) -> Result<f64, FormulaError> {
        let elements = parse_formula(formula, &self.lookup, &self.config)?;
        let mass = molar_mass(&elements, &self.lookup);
        mass.ok_or_else(|| FormulaError::UnknownElement(formula.to_string()))
    }

    /// Splits an equation into compounds and collects its elements
    pub fn parse_equation(&self, equation: &str) -> Result<ParsedEquation, EquationError> {
        parse_equation(equation, &self.lookup, &self.config)
    }

    /// Balances the requested equation with the requested method
    pub fn balance(&self, request: &BalanceRequest) -> BalanceResult {
        match request.method {
            BalanceMethod::TrialAndError => self.balance_by_trial_and_error(&request.equation),
            BalanceMethod::Algebraic => self.balance_by_algebraic_method(&request.equation),
        }
    }

    /// Balances an equation with the bounded trial-and-error search
    pub fn balance_by_trial_and_error(&self, equation: &str) -> BalanceResult {
        self.run(equation, BalanceMethod::TrialAndError, |parsed, steps| trial::balance(parsed, &self.config, steps))
    }

    /// Balances an equation with exact Gaussian elimination
    pub fn balance_by_algebraic_method(&self, equation: &str) -> BalanceResult {
        self.run(equation, BalanceMethod::Algebraic, algebraic::balance)
    }

    fn run<F>(&self, equation: &str, method: BalanceMethod, solve: F) -> BalanceResult
    where
        F: FnOnce(&ParsedEquation, &mut Vec<String>) -> Result<Vec<u64>, BalanceError>,
    {
        let mut steps = Vec::new();
        let outcome = self
            .parse_equation(equation)
            .map_err(BalanceError::from)
            .and_then(|parsed| {
                steps.push(format!(
                    "Parsed {} reactant(s) and {} product(s) containing {}",
                    parsed.equation.reactants.len(),
                    parsed.equation.products.len(),
                    parsed.elements.join(", "),
                ));
                let coefficients = solve(&parsed, &mut steps)?;
                let balanced = parsed.equation.with_coefficients(&coefficients);
                verify_conservation(&balanced)?;
                steps.push("Verified conservation of every element".to_string());
                Ok(balanced)
            });

        match outcome {
            Ok(balanced) => {
                info!("balanced '{}' with {} method: {}", equation, method, balanced);
                BalanceResult::success(equation, method, balanced, steps)
            },
            Err(err) => {
                warn!("failed to balance '{}' with {} method: {}", equation, method, err);
                BalanceResult::failure(equation, method, &err, steps)
            },
        }
    }
}

/// Signed stoichiometric matrix
///
/// One row per element of `parsed.elements`, one column per compound (reactants first).
/// Product counts are negated, so balanced coefficients `x` satisfy `Mx = 0`.
pub fn stoichiometric_matrix(parsed: &ParsedEquation) -> Result<Vec<Vec<i64>>, BalanceError> {
    let reactant_count = parsed.equation.reactants.len();
    let mut matrix = vec![vec![0i64; parsed.equation.compound_count()]; parsed.elements.len()];

    for (col, compound) in parsed.equation.compounds().enumerate() {
        let sign = if col < reactant_count { 1 } else { -1 };
        for element in compound.elements.iter() {
            let row = parsed
                .elements
                .iter()
                .position(|e| *e == element.symbol)
                .ok_or_else(|| BalanceError::MissingElement(element.symbol.clone()))?;
            matrix[row][col] = sign * i64::from(element.count);
        }
    }

    Ok(matrix)
}

/// Checks that every element has the same atom count on both sides
pub fn verify_conservation(equation: &ChemicalEquation) -> Result<(), BalanceError> {
    match equation.element_balances().into_iter().find(|b| !b.is_balanced) {
        Some(balance) => Err(BalanceError::Unbalanced {
            element: balance.element,
            reactants: balance.reactant_count,
            products: balance.product_count,
        }),
        None => Ok(()),
    }
}

/// Greatest common divisor of two integers
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
