//! Splitting of an equation string into reactant and product compounds.

use crate::config::BalancerConfig;
use crate::elements::ElementLookup;
use crate::error::{EquationError, Side};
use crate::formula::{atom_count, parse_formula, ParsedElement};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// Accepted reaction arrows, in the order they are searched for
pub const REACTION_ARROWS: [&str; 3] = ["→", "->", "="];

/// Arrow used when an equation is formatted
pub const OUTPUT_ARROW: &str = "→";

// leading coefficient of a term, the formula follows it
static COEFFICIENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").expect("coefficient regex is valid"));

/// Compound on one side of an equation (e.g. `2H2O`)
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EquationCompound {
    /// Formula as written in the equation
    pub formula: String,
    /// Stoichiometric coefficient (at least 1)
    pub coefficient: u64,
    /// Parsed elements of the formula
    pub elements: Vec<ParsedElement>,
}
impl EquationCompound {
    /// Number of atoms of `symbol` in one molecule of the compound
    pub fn atom_count(&self, symbol: &str) -> u32 {
        atom_count(&self.elements, symbol)
    }
}
impl Display for EquationCompound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.coefficient != 1 {
            write!(f, "{}", self.coefficient)?;
        }
        write!(f, "{}", self.formula)
    }
}

/// Conservation of one element across the equation
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ElementBalance {
    pub element: String,
    /// Atoms on the reactant side (coefficient times count, summed)
    pub reactant_count: u128,
    pub product_count: u128,
    pub is_balanced: bool,
}

/// A chemical equation (e.g. 2H2 + O2 → 2H2O)
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChemicalEquation {
    /// Compounds before the arrow
    pub reactants: Vec<EquationCompound>,
    /// Compounds after the arrow
    pub products: Vec<EquationCompound>,
}
impl ChemicalEquation {
    /// All compounds, reactants first
    pub fn compounds(&self) -> impl Iterator<Item = &EquationCompound> {
        self.reactants.iter().chain(self.products.iter())
    }

    /// Number of compounds on both sides
    pub fn compound_count(&self) -> usize {
        self.reactants.len() + self.products.len()
    }

    /// Sorted set of all element symbols appearing in the equation
    pub fn elements(&self) -> BTreeSet<String> {
        self.compounds()
            .flat_map(|c| c.elements.iter().map(|e| e.symbol.clone()))
            .collect()
    }

    /// Coefficients of all compounds, reactants first
    pub fn coefficients(&self) -> Vec<u64> {
        self.compounds().map(|c| c.coefficient).collect()
    }

    /// Returns a copy of the equation with new coefficients (reactants first)
    /// # Panics
    /// If the number of coefficients differs from the number of compounds
    pub fn with_coefficients(&self, coefficients: &[u64]) -> Self {
        assert_eq!(coefficients.len(), self.compound_count(), "one coefficient per compound");
        let (reactant_coefficients, product_coefficients) = coefficients.split_at(self.reactants.len());
        let apply = |compounds: &[EquationCompound], coefficients: &[u64]| -> Vec<EquationCompound> {
            compounds
                .iter()
                .zip(coefficients)
                .map(|(compound, &coefficient)| EquationCompound { coefficient, ..compound.clone() })
                .collect()
        };
        Self {
            reactants: apply(&self.reactants, reactant_coefficients),
            products: apply(&self.products, product_coefficients),
        }
    }

    /// Atom counts of every element on both sides, with the current coefficients
    ///
    /// Counts are summed in `u128`, a `u64` coefficient times a `u32` atom count always fits.
    pub fn element_balances(&self) -> Vec<ElementBalance> {
        let side_total = |compounds: &[EquationCompound], element: &str| -> u128 {
            compounds.iter().map(|c| u128::from(c.coefficient) * u128::from(c.atom_count(element))).sum()
        };
        self.elements()
            .into_iter()
            .map(|element| {
                let reactant_count = side_total(&self.reactants, &element);
                let product_count = side_total(&self.products, &element);
                ElementBalance {
                    element,
                    reactant_count,
                    product_count,
                    is_balanced: reactant_count == product_count,
                }
            })
            .collect()
    }

    /// Returns true if every element is conserved with the current coefficients
    pub fn is_balanced(&self) -> bool {
        self.element_balances().iter().all(|b| b.is_balanced)
    }
}
impl Display for ChemicalEquation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let side = |compounds: &[EquationCompound]| {
            compounds.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" + ")
        };
        write!(f, "{} {} {}", side(&self.reactants), OUTPUT_ARROW, side(&self.products))
    }
}

/// Equation together with the elements that have to be conserved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedEquation {
    pub equation: ChemicalEquation,
    /// Sorted element symbols of both sides
    pub elements: Vec<String>,
}

/// Parses an equation such as `H2 + O2 = H2O`
/// # Arguments
/// * `input` - equation with exactly one arrow (`→`, `->` or `=`)
/// * `lookup` - decides which symbols are elements
/// * `config` - formula and coefficient limits
/// # Returns
/// * `Ok` - compounds of both sides and the sorted element set
/// * `Err` - first error found, naming the side and formula that failed
pub fn parse_equation<L: ElementLookup>(input: &str, lookup: &L, config: &BalancerConfig) -> Result<ParsedEquation, EquationError> {
    let arrow_count: usize = REACTION_ARROWS.iter().map(|arrow| input.matches(arrow).count()).sum();
    if arrow_count > 1 { return Err(EquationError::MultipleArrows(arrow_count)); }

    let (reactants_str, products_str) = REACTION_ARROWS
        .iter()
        .find_map(|arrow| input.split_once(arrow))
        .ok_or(EquationError::MissingArrow)?;

    let equation = ChemicalEquation {
        reactants: parse_side(reactants_str, Side::Reactants, lookup, config)?,
        products: parse_side(products_str, Side::Products, lookup, config)?,
    };
    let elements = equation.elements().into_iter().collect();

    Ok(ParsedEquation { equation, elements })
}

fn parse_side<L: ElementLookup>(input: &str, side: Side, lookup: &L, config: &BalancerConfig) -> Result<Vec<EquationCompound>, EquationError> {
    if input.trim().is_empty() { return Err(EquationError::EmptySide(side)); }
    input.split('+').map(|term| parse_term(term.trim(), side, lookup, config)).collect()
}

fn parse_term<L: ElementLookup>(term: &str, side: Side, lookup: &L, config: &BalancerConfig) -> Result<EquationCompound, EquationError> {
    let digits = COEFFICIENT.find(term).map_or("", |m| m.as_str());
    let formula = &term[digits.len()..];

    let coefficient = if digits.is_empty() {
        1
    } else {
        digits
            .parse::<u64>()
            .ok()
            .filter(|c| (1..=config.max_coefficient).contains(c))
            .ok_or_else(|| EquationError::InvalidCoefficient {
                side,
                term: term.to_string(),
                max: config.max_coefficient,
            })?
    };

    let formula = formula.trim();
    let elements = parse_formula(formula, lookup, config).map_err(|source| EquationError::Compound {
        side,
        formula: formula.to_string(),
        source,
    })?;

    Ok(EquationCompound {
        formula: formula.to_string(),
        coefficient,
        elements,
    })
}
