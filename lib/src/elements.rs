//! Element lookup used by the formula parser.

use mendeleev::{Element, ALL_ELEMENTS};
use std::collections::HashMap;

/// Read-only source of element data
///
/// The parser only needs [`ElementLookup::is_valid_element`], molar mass calculation also
/// needs [`ElementLookup::atomic_mass`]. Implementations must be synchronous and side-effect free.
pub trait ElementLookup {
    /// Returns true if `symbol` (e.g. `"Fe"`) is a known element
    fn is_valid_element(&self, symbol: &str) -> bool;

    /// Returns the standard atomic mass of the element in g/mol
    fn atomic_mass(&self, symbol: &str) -> Option<f64>;
}

/// Periodic table backed by the `mendeleev` element data
/// # Example
/// ```
/// use chembalance::{ElementLookup, PeriodicTable};
///
/// let table = PeriodicTable::new();
///
/// assert!(table.is_valid_element("Fe"));
/// assert!(!table.is_valid_element("Fx"));
/// ```
#[derive(Clone, Debug)]
pub struct PeriodicTable {
    /// Elements by their symbol
    elements: HashMap<&'static str, Element>,
}
impl PeriodicTable {
    /// Builds the symbol table from all known elements
    pub fn new() -> Self {
        let elements = ALL_ELEMENTS.iter().map(|e| (e.symbol(), *e)).collect();
        Self { elements }
    }

    /// Returns the element with the given symbol
    pub fn element(&self, symbol: &str) -> Option<Element> {
        self.elements.get(symbol).copied()
    }

    /// Number of elements in the table
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the table has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
impl Default for PeriodicTable {
    fn default() -> Self {
        Self::new()
    }
}
impl ElementLookup for PeriodicTable {
    fn is_valid_element(&self, symbol: &str) -> bool {
        self.elements.contains_key(symbol)
    }

    fn atomic_mass(&self, symbol: &str) -> Option<f64> {
        self.element(symbol).map(|e| f64::from(e.atomic_weight()))
    }
}
/// Lets several balancers borrow one table
impl<L: ElementLookup + ?Sized> ElementLookup for &L {
    fn is_valid_element(&self, symbol: &str) -> bool {
        (**self).is_valid_element(symbol)
    }

    fn atomic_mass(&self, symbol: &str) -> Option<f64> {
        (**self).atomic_mass(symbol)
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn symbols() {
        let table = PeriodicTable::new();
        assert!(table.len() >= 118);
        for symbol in ["H", "He", "C", "O", "Na", "Cl", "Fe", "Cu", "Xe", "Lu", "Pt"] {
            assert!(table.is_valid_element(symbol), "{} should be valid", symbol);
        }
        for symbol in ["", "h", "HE", "Xx", "J", "Q"] {
            assert!(!table.is_valid_element(symbol), "{} should be invalid", symbol);
        }
    }

    #[test]
    fn atomic_masses() {
        let table = PeriodicTable::new();
        assert_abs_diff_eq!(table.atomic_mass("H").unwrap(), 1.008, epsilon = 1e-2);
        assert_abs_diff_eq!(table.atomic_mass("O").unwrap(), 15.999, epsilon = 1e-2);
        assert_abs_diff_eq!(table.atomic_mass("Fe").unwrap(), 55.845, epsilon = 1e-2);
        assert!(table.atomic_mass("Xx").is_none());
    }

    #[test]
    fn balancers_share_a_table() {
        use crate::balance::{BalanceMethod, BalanceRequest, Balancer};
        use crate::config::BalancerConfig;

        let table = PeriodicTable::new();
        let strict = Balancer::with_lookup(&table, BalancerConfig { max_coefficient: 5, ..BalancerConfig::default() });
        let relaxed = Balancer::with_lookup(&table, BalancerConfig::default());

        let request = BalanceRequest::new("6H2 + O2 = H2O").with_method(BalanceMethod::Algebraic);
        assert!(!strict.balance(&request).is_valid);
        assert_eq!(relaxed.balance(&request).balanced_equation, "2H2 + O2 → 2H2O");
        assert_abs_diff_eq!(relaxed.molar_mass("H2O").unwrap(), 18.015, epsilon = 1e-2);
    }
}
