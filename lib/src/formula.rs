//! Parsing of chemical formulas (e.g. `Ca(OH)2`) into element counts.

use crate::config::BalancerConfig;
use crate::elements::ElementLookup;
use crate::error::FormulaError;
use serde::{Deserialize, Serialize};

/// Element and the number of its atoms in a formula
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ParsedElement {
    /// Element symbol (e.g. `"Cl"`)
    pub symbol: String,
    /// Number of atoms (at least 1)
    pub count: u32,
}

/// Result of parsing a chemical formula
///
/// Elements are listed in the order of their first occurrence in the formula,
/// every symbol appears only once.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParsedFormula {
    /// Elements with their total counts
    pub elements: Vec<ParsedElement>,
    /// Normalized formula string
    pub formula: String,
    /// Whether the formula was parsed successfully
    pub is_valid: bool,
    /// Error message if the formula is invalid
    pub error: Option<String>,
}
impl ParsedFormula {
    pub(crate) fn valid(formula: String, elements: Vec<ParsedElement>) -> Self {
        Self { elements, formula, is_valid: true, error: None }
    }

    pub(crate) fn invalid(formula: String, error: &FormulaError) -> Self {
        Self {
            elements: Vec::new(),
            formula,
            is_valid: false,
            error: Some(error.to_string()),
        }
    }

    /// Returns `(symbol, count)` pairs in first-occurrence order
    pub fn element_counts(&self) -> Vec<(&str, u32)> {
        self.elements.iter().map(|e| (e.symbol.as_str(), e.count)).collect()
    }

    /// Number of atoms of the given element (0 if it is not present)
    pub fn count_of(&self, symbol: &str) -> u32 {
        atom_count(&self.elements, symbol)
    }

    /// Total number of atoms in the molecule
    pub fn total_atoms(&self) -> u64 {
        self.elements.iter().map(|e| u64::from(e.count)).sum()
    }
}

/// Number of atoms of `symbol` in a parsed composition
pub fn atom_count(elements: &[ParsedElement], symbol: &str) -> u32 {
    elements.iter().find(|e| e.symbol == symbol).map_or(0, |e| e.count)
}

/// Normalizes a formula before parsing
///
/// Whitespace is removed, square and curly brackets become parentheses.
/// # Example
/// ```
/// use chembalance::normalize_formula;
///
/// assert_eq!(normalize_formula(" K4[Fe(CN)6] "), "K4(Fe(CN)6)");
/// ```
pub fn normalize_formula(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '[' | '{' => '(',
            ']' | '}' => ')',
            c => c,
        })
        .collect()
}

/// Checks that parentheses of a formula are balanced
///
/// The running depth must never become negative and must end at zero.
pub fn validate_formula_syntax(formula: &str) -> Result<(), FormulaError> {
    let mut depth = 0usize;
    for c in formula.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or(FormulaError::UnbalancedParentheses)?,
            _ => {},
        }
    }
    if depth != 0 { return Err(FormulaError::UnbalancedParentheses); }
    Ok(())
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    Element(String),
    Number(u64),
    OpenParenthesis,
    CloseParenthesis,
}

fn tokenize(formula: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::OpenParenthesis);
                i += 1;
            },
            ')' => {
                tokens.push(Token::CloseParenthesis);
                i += 1;
            },
            c if c.is_ascii_uppercase() => {
                let mut symbol = c.to_string();
                if let Some(&next) = chars.get(i + 1) {
                    if next.is_ascii_lowercase() {
                        symbol.push(next);
                        i += 1;
                    }
                }
                tokens.push(Token::Element(symbol));
                i += 1;
            },
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let digits: String = chars[start..i].iter().collect();
                // a run of digits that overflows u64 is out of range anyway
                tokens.push(Token::Number(digits.parse().unwrap_or(u64::MAX)));
            },
            c => return Err(FormulaError::InvalidCharacter { character: c, position: i }),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token sequence of one formula
struct FormulaParser<'a, L: ElementLookup> {
    tokens: &'a [Token],
    position: usize,
    lookup: &'a L,
    max_count: u32,
}
impl<'a, L: ElementLookup> FormulaParser<'a, L> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    // optional count after an element or a closing parenthesis
    fn count(&mut self) -> Result<u32, FormulaError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.position += 1;
                if *n == 0 || *n > u64::from(self.max_count) {
                    return Err(FormulaError::CountOutOfRange { count: *n, max: self.max_count });
                }
                Ok(*n as u32)
            },
            _ => Ok(1),
        }
    }

    /// Parses elements and groups until the end of input or a closing parenthesis
    fn group(&mut self, depth: usize) -> Result<Vec<ParsedElement>, FormulaError> {
        let mut accumulator = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                Token::Element(symbol) => {
                    self.position += 1;
                    let count = self.count()?;
                    if !self.lookup.is_valid_element(symbol) {
                        return Err(FormulaError::UnknownElement(symbol.clone()));
                    }
                    merge(&mut accumulator, symbol, u64::from(count), self.max_count)?;
                },
                Token::OpenParenthesis => {
                    self.position += 1;
                    let inner = self.group(depth + 1)?;
                    match self.peek() {
                        Some(Token::CloseParenthesis) => self.position += 1,
                        _ => return Err(FormulaError::UnbalancedParentheses),
                    }
                    if inner.is_empty() { return Err(FormulaError::EmptyGroup); }
                    let multiplier = u64::from(self.count()?);
                    for element in inner {
                        merge(&mut accumulator, &element.symbol, u64::from(element.count) * multiplier, self.max_count)?;
                    }
                },
                Token::CloseParenthesis => {
                    if depth == 0 { return Err(FormulaError::UnbalancedParentheses); }
                    return Ok(accumulator);
                },
                Token::Number(_) => return Err(FormulaError::UnexpectedToken { position: self.position }),
            }
        }
        Ok(accumulator)
    }
}

fn merge(accumulator: &mut Vec<ParsedElement>, symbol: &str, count: u64, max: u32) -> Result<(), FormulaError> {
    let too_many = |total| FormulaError::TooManyAtoms { total, max };
    match accumulator.iter_mut().find(|e| e.symbol == symbol) {
        Some(existing) => {
            let total = u64::from(existing.count) + count;
            existing.count = u32::try_from(total).map_err(|_| too_many(total))?;
        },
        None => accumulator.push(ParsedElement {
            symbol: symbol.to_string(),
            count: u32::try_from(count).map_err(|_| too_many(count))?,
        }),
    }
    Ok(())
}

/// Parses a formula into its elements
/// # Arguments
/// * `formula` - chemical formula, e.g. `Cu(NO3)2`
/// * `lookup` - decides which symbols are elements
/// * `config` - length and atom count limits
/// # Returns
/// * `Ok` - elements in first-occurrence order, counts of repeated symbols summed
/// * `Err` - error that occurred during parsing
pub fn parse_formula<L: ElementLookup>(formula: &str, lookup: &L, config: &BalancerConfig) -> Result<Vec<ParsedElement>, FormulaError> {
    let formula = normalize_formula(formula);
    if formula.is_empty() { return Err(FormulaError::Empty); }

    let length = formula.chars().count();
    if length > config.max_formula_length {
        return Err(FormulaError::TooLong { length, max: config.max_formula_length });
    }

    let tokens = tokenize(&formula)?;
    validate_formula_syntax(&formula)?;

    let mut parser = FormulaParser {
        tokens: &tokens,
        position: 0,
        lookup,
        max_count: config.max_atoms_per_molecule,
    };
    let elements = parser.group(0)?;
    if parser.position != tokens.len() {
        return Err(FormulaError::UnexpectedToken { position: parser.position });
    }
    if elements.is_empty() { return Err(FormulaError::Empty); }

    let total: u64 = elements.iter().map(|e| u64::from(e.count)).sum();
    if total > u64::from(config.max_atoms_per_molecule) {
        return Err(FormulaError::TooManyAtoms { total, max: config.max_atoms_per_molecule });
    }

    Ok(elements)
}

/// Parses a formula and wraps the outcome into a [`ParsedFormula`]
pub fn parse_chemical_formula_with<L: ElementLookup>(formula: &str, lookup: &L, config: &BalancerConfig) -> ParsedFormula {
    let normalized = normalize_formula(formula);
    match parse_formula(&normalized, lookup, config) {
        Ok(elements) => ParsedFormula::valid(normalized, elements),
        Err(err) => ParsedFormula::invalid(normalized, &err),
    }
}

/// Molar mass of a parsed composition in g/mol
///
/// Returns `None` if the lookup has no mass for one of the elements.
pub fn molar_mass<L: ElementLookup>(elements: &[ParsedElement], lookup: &L) -> Option<f64> {
    elements
        .iter()
        .map(|e| lookup.atomic_mass(&e.symbol).map(|mass| mass * f64::from(e.count)))
        .sum()
}
