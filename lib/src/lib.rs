//! Balancing of chemical equations.
//!
//! Formulas such as `Ca(OH)2` or `K4[Fe(CN)6]` are parsed into element counts, equations
//! such as `Fe + O2 = Fe2O3` are split into compounds and balanced either by a bounded
//! trial-and-error search or algebraically (null space of the stoichiometric matrix,
//! computed with exact fractions).
//!
//! ```
//! use chembalance::{balance_chemical_equation, BalanceMethod, BalanceRequest};
//!
//! let request = BalanceRequest::new("C2H6 + O2 -> CO2 + H2O").with_method(BalanceMethod::Algebraic);
//! let result = balance_chemical_equation(&request);
//!
//! assert!(result.is_valid);
//! assert_eq!(result.balanced_equation, "2C2H6 + 7O2 → 4CO2 + 6H2O");
//! ```

pub mod balance;
pub mod config;
pub mod elements;
pub mod equation;
pub mod error;
pub mod formula;
pub mod fraction;

pub use balance::{BalanceMethod, BalanceRequest, BalanceResult, Balancer, FailureKind};
pub use config::BalancerConfig;
pub use elements::{ElementLookup, PeriodicTable};
pub use equation::{ChemicalEquation, ElementBalance, EquationCompound, REACTION_ARROWS};
pub use error::{BalanceError, ConfigError, EquationError, FormulaError, FractionError, Side};
pub use formula::{normalize_formula, validate_formula_syntax, ParsedElement, ParsedFormula};
pub use fraction::RobustFraction;





/// Parses a chemical formula with the built-in periodic table and default limits
///
/// Never fails: an invalid formula is returned with `is_valid == false` and an error message.
pub fn parse_chemical_formula(formula: &str) -> ParsedFormula {
    Balancer::default().parse_formula(formula)
}

/// Balances an equation with the built-in periodic table and default limits
///
/// Never fails: a failed attempt is returned with `is_valid == false`, an error message
/// and the steps performed before the failure.
pub fn balance_chemical_equation(request: &BalanceRequest) -> BalanceResult {
    Balancer::default().balance(request)
}





#[cfg(test)]
mod tests {
    use super::*;

    fn test_equation(equation: &str, solved_equation: &str) {
        let request = BalanceRequest::new(equation).with_method(BalanceMethod::Algebraic);
        let result = balance_chemical_equation(&request);

        assert!(result.is_valid, "{}: {:?}", equation, result.error);
        assert_eq!(result.balanced_equation, solved_equation);
    }

    fn test_both_methods(equation: &str, solved_equation: &str) {
        test_equation(equation, solved_equation);

        let result = balance_chemical_equation(&BalanceRequest::new(equation));
        assert!(result.is_valid, "{}: {:?}", equation, result.error);
        assert_eq!(result.balanced_equation, solved_equation);
    }


    #[test]
    fn arrow_types() {
        for arrow in REACTION_ARROWS {
            let equation = format!("H2 + O2 {} H2O", arrow);
            test_both_methods(&equation, "2H2 + O2 → 2H2O");
        }
    }

    #[test]
    fn formula_entry_point() {
        let formula = parse_chemical_formula("Ca(OH)2");
        assert!(formula.is_valid);
        assert_eq!(formula.element_counts(), vec![("Ca", 1), ("O", 2), ("H", 2)]);

        let formula = parse_chemical_formula("H2O$");
        assert!(!formula.is_valid);
        assert!(formula.error.is_some());
    }

    #[test]
    fn failed_attempts() {
        let result = balance_chemical_equation(&BalanceRequest::new("H2 + O2 = H2Xx"));
        assert!(!result.is_valid);
        assert_eq!(result.failure, Some(FailureKind::Parse));
        assert!(result.error.unwrap().contains("Xx"));

        let result = balance_chemical_equation(&BalanceRequest::new("C8H18 + O2 = CO2 + H2O"));
        assert!(!result.is_valid);
        assert_eq!(result.failure, Some(FailureKind::Balance));
        assert_eq!(result.method, BalanceMethod::TrialAndError);
    }

    #[test]
    fn eq1() {
        test_both_methods("H2 + O2 = H2O", "2H2 + O2 → 2H2O");
    }

    #[test]
    fn eq2() {
        test_equation(
            "[Cr(N2H4CO)6]4[Cr(CN)6]3 + KMnO4 + H2SO4 = K2Cr2O7 + MnSO4 + CO2 + KNO3 + K2SO4 + H2O",
            "10[Cr(N2H4CO)6]4[Cr(CN)6]3 + 1176KMnO4 + 1399H2SO4 → 35K2Cr2O7 + 1176MnSO4 + 420CO2 + 660KNO3 + 223K2SO4 + 1879H2O",
        );
    }

    #[test]
    fn eq3() {
        test_both_methods("P4O10 + H2O = H3PO4", "P4O10 + 6H2O → 4H3PO4");
    }

    #[test]
    fn eq4() {
        test_equation("CO2 + H2O = C6H12O6 + O2", "6CO2 + 6H2O → C6H12O6 + 6O2");
    }

    #[test]
    fn eq5() {
        test_both_methods("SiCl4 + H2O = H4SiO4 + HCl", "SiCl4 + 4H2O → H4SiO4 + 4HCl");
    }

    #[test]
    fn eq6() {
        test_both_methods("Al + HCl = AlCl3 + H2", "2Al + 6HCl → 2AlCl3 + 3H2");
    }

    #[test]
    fn eq7() {
        test_both_methods("Na2CO3 + HCl = NaCl + H2O + CO2", "Na2CO3 + 2HCl → 2NaCl + H2O + CO2");
    }

    #[test]
    fn eq8() {
        test_both_methods("C7H6O2 + O2 = CO2 + H2O", "2C7H6O2 + 15O2 → 14CO2 + 6H2O");
    }

    #[test]
    fn eq9() {
        test_both_methods("Fe2(SO4)3 + KOH = K2SO4 + Fe(OH)3", "Fe2(SO4)3 + 6KOH → 3K2SO4 + 2Fe(OH)3");
    }

    #[test]
    fn eq10() {
        test_both_methods("Ca3(PO4)2 + SiO2 = P4O10 + CaSiO3", "2Ca3(PO4)2 + 6SiO2 → P4O10 + 6CaSiO3");
    }

    #[test]
    fn eq11() {
        test_both_methods("KClO3 = KClO4 + KCl", "4KClO3 → 3KClO4 + KCl");
    }

    #[test]
    fn eq12() {
        test_both_methods("Al2(SO4)3 + Ca(OH)2 = Al(OH)3 + CaSO4", "Al2(SO4)3 + 3Ca(OH)2 → 2Al(OH)3 + 3CaSO4");
    }

    #[test]
    fn eq13() {
        test_equation("H2SO4 + HI = H2S + I2 + H2O", "H2SO4 + 8HI → H2S + 4I2 + 4H2O");
    }

    #[test]
    fn eq14() {
        test_both_methods("C2H6 + O2 = CO2 + H2O", "2C2H6 + 7O2 → 4CO2 + 6H2O");
    }

    #[test]
    fn eq15() {
        test_both_methods("NaN3 = Na + N2", "2NaN3 → 2Na + 3N2");
    }

    #[test]
    fn eq16() {
        test_equation("Na + Fe2O3 = Na2O + Fe", "6Na + Fe2O3 → 3Na2O + 2Fe");
    }

    #[test]
    fn eq17() {
        test_both_methods("Mg + N2 = Mg3N2", "3Mg + N2 → Mg3N2");
    }

    #[test]
    fn eq18() {
        test_both_methods("Na + NH3 = NaNH2 + H2", "2Na + 2NH3 → 2NaNH2 + H2");
    }

    #[test]
    fn eq19() {
        test_both_methods("Na2O + CO2 + H2O = NaHCO3", "Na2O + 2CO2 + H2O → 2NaHCO3");
    }

    #[test]
    fn eq20() {
        test_both_methods("P4S3 + O2 = P4O6 + SO2", "P4S3 + 6O2 → P4O6 + 3SO2");
    }

    #[test]
    fn eq21() {
        test_both_methods("Na3PO4 + CaCl2 = Ca3(PO4)2 + NaCl", "2Na3PO4 + 3CaCl2 → Ca3(PO4)2 + 6NaCl");
    }

    #[test]
    fn eq22() {
        test_equation("C8H18 + O2 = CO2 + H2O", "2C8H18 + 25O2 → 16CO2 + 18H2O");
    }

    #[test]
    fn eq23() {
        test_both_methods("C2H6O + O2 = CO2 + H2O", "C2H6O + 3O2 → 2CO2 + 3H2O");
    }

    #[test]
    fn eq24() {
        test_both_methods("Pb(NO3)2 + KI = PbI2 + KNO3", "Pb(NO3)2 + 2KI → PbI2 + 2KNO3");
    }

    #[test]
    fn eq25() {
        test_both_methods("N2O5 = NO2 + O2", "2N2O5 → 4NO2 + O2");
    }

    #[test]
    fn eq26() {
        test_both_methods("CO + O2 = CO2", "2CO + O2 → 2CO2");
    }

    #[test]
    fn eq27() {
        test_equation("C57H110O6 + O2 = CO2 + H2O", "2C57H110O6 + 163O2 → 114CO2 + 110H2O");
    }

    #[test]
    fn eq28() {
        test_equation(
            "K4[Fe(SCN)6] + K2Cr2O7 + H2SO4 = Fe2(SO4)3 + Cr2(SO4)3 + CO2 + H2O + K2SO4 + KNO3",
            "6K4[Fe(SCN)6] + 97K2Cr2O7 + 355H2SO4 → 3Fe2(SO4)3 + 97Cr2(SO4)3 + 36CO2 + 355H2O + 91K2SO4 + 36KNO3",
        );
    }

    #[test]
    fn eq29() {
        test_both_methods("Al + H2SO4 = Al2(SO4)3 + H2", "2Al + 3H2SO4 → Al2(SO4)3 + 3H2");
    }

    #[test]
    fn eq30() {
        test_equation("C7H10N + O2 = CO2 + H2O + NO2", "2C7H10N + 21O2 → 14CO2 + 10H2O + 2NO2");
    }

    #[test]
    fn eq31() {
        test_both_methods("BaO + Al = BaAl4 + Al2O3", "3BaO + 14Al → 3BaAl4 + Al2O3");
    }

    #[test]
    fn eq32() {
        test_equation("Pt + HNO3 + HCl = H2PtCl6 + NO2 + H2O", "Pt + 4HNO3 + 6HCl → H2PtCl6 + 4NO2 + 4H2O");
    }

    #[test]
    fn eq33() {
        test_both_methods("XeF6 + H2O = XeO3 + HF", "XeF6 + 3H2O → XeO3 + 6HF");
    }

    #[test]
    fn eq34() {
        test_equation("C6H14 + O2 = CO2 + H2O", "2C6H14 + 19O2 → 12CO2 + 14H2O");
    }

    #[test]
    fn eq35() {
        test_equation("K2MnF6 + SbF5 = KSbF6 + MnF3 + F2", "2K2MnF6 + 4SbF5 → 4KSbF6 + 2MnF3 + F2");
    }

    #[test]
    fn eq36() {
        test_equation("Cu + HNO3 = Cu(NO3)2 + NO + H2O", "3Cu + 8HNO3 → 3Cu(NO3)2 + 2NO + 4H2O");
    }

    #[test]
    fn eq37() {
        test_equation("Cu2S + HNO3 = Cu(NO3)2 + CuSO4 + NO2 + H2O", "Cu2S + 12HNO3 → Cu(NO3)2 + CuSO4 + 10NO2 + 6H2O");
    }

    #[test]
    fn eq38() {
        test_equation("NaBr + NaBrO3 + H2SO4 = Br2 + Na2SO4 + H2O", "5NaBr + NaBrO3 + 3H2SO4 → 3Br2 + 3Na2SO4 + 3H2O");
    }

    #[test]
    fn eq39() {
        test_equation("KNO3 + C12H22O11 = N2 + CO2 + H2O + K2CO3", "48KNO3 + 5C12H22O11 → 24N2 + 36CO2 + 55H2O + 24K2CO3");
    }
}
