//! Trial-and-error balancing.
//!
//! Every compound gets a coefficient slot (reactants first, then products), all starting at 1.
//! The slots are advanced like an odometer: the last slot is incremented, and when it passes
//! the ceiling it is reset to 1 and the carry moves to the previous slot. The search stops when
//! the first slot overflows or when the iteration budget is spent.
//!
//! The search order is fixed, so an equation always yields the same first solution.
//! Equations that need a coefficient above the ceiling (15 by default) can't be balanced this way.

use super::{gcd, stoichiometric_matrix};
use crate::config::BalancerConfig;
use crate::equation::ParsedEquation;
use crate::error::BalanceError;
use log::debug;

/// Searches for the first coefficient vector that conserves every element
/// # Arguments
/// * `parsed` - equation to balance
/// * `config` - coefficient ceiling, iteration budget and progress interval
/// * `steps` - trace the search appends to
/// # Returns
/// * `Ok` - coefficients reduced by their greatest common divisor (reactants first)
/// * `Err` - if no solution was found within the ceiling and the budget
pub fn balance(parsed: &ParsedEquation, config: &BalancerConfig, steps: &mut Vec<String>) -> Result<Vec<u64>, BalanceError> {
    let matrix = stoichiometric_matrix(parsed)?;
    let ceiling = config.trial_max_coefficient;
    let mut coefficients = vec![1u64; parsed.equation.compound_count()];

    steps.push(format!(
        "Starting trial-and-error search with all {} coefficients set to 1 (ceiling {}, budget {} iterations)",
        coefficients.len(),
        ceiling,
        config.trial_max_iterations,
    ));
    steps.push(format!("Elements to balance: {}", parsed.elements.join(", ")));

    let mut iterations = 0u64;
    while iterations < config.trial_max_iterations {
        iterations += 1;

        if conserves_all(&matrix, &coefficients) {
            steps.push(format!("Found a solution after {} iterations: {}", iterations, join(&coefficients)));
            debug!("trial-and-error solution {:?} after {} iterations", coefficients, iterations);

            let divisor = coefficients.iter().fold(0, |acc, &c| gcd(acc, c));
            if divisor > 1 {
                coefficients.iter_mut().for_each(|c| *c /= divisor);
                steps.push(format!("Divided all coefficients by {}: {}", divisor, join(&coefficients)));
            }
            return Ok(coefficients);
        }

        if config.trial_progress_interval > 0 && iterations % config.trial_progress_interval == 0 {
            steps.push(format!("Tried {} combinations, currently at {}", iterations, join(&coefficients)));
            debug!("trial-and-error progress: {} iterations", iterations);
        }

        if !advance(&mut coefficients, ceiling) {
            steps.push(format!("Search space exhausted after {} combinations", iterations));
            break;
        }
    }

    Err(BalanceError::SearchExhausted { tried: iterations })
}

/// Moves the odometer one position forward, returns false once the first slot overflows
fn advance(coefficients: &mut [u64], ceiling: u64) -> bool {
    for slot in coefficients.iter_mut().rev() {
        if *slot < ceiling {
            *slot += 1;
            return true;
        }
        *slot = 1;
    }
    false
}

fn conserves_all(matrix: &[Vec<i64>], coefficients: &[u64]) -> bool {
    matrix.iter().all(|row| {
        let (reactants, products) = row.iter().zip(coefficients).fold((0i128, 0i128), |(r, p), (&count, &c)| {
            let atoms = i128::from(count.abs()) * i128::from(c);
            if count > 0 { (r + atoms, p) } else { (r, p + atoms) }
        });
        reactants == products
    })
}

fn join(coefficients: &[u64]) -> String {
    coefficients.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Balancer;

    fn solve(equation: &str) -> Result<Vec<u64>, BalanceError> {
        solve_with(equation, &BalancerConfig::default()).0
    }

    fn solve_with(equation: &str, config: &BalancerConfig) -> (Result<Vec<u64>, BalanceError>, Vec<String>) {
        let parsed = Balancer::new(config.clone()).parse_equation(equation).unwrap();
        let mut steps = Vec::new();
        (balance(&parsed, config, &mut steps), steps)
    }

    #[test]
    fn odometer() {
        let mut c = vec![1, 1, 1];
        assert!(advance(&mut c, 3));
        assert_eq!(c, vec![1, 1, 2]);
        let mut c = vec![1, 3, 3];
        assert!(advance(&mut c, 3));
        assert_eq!(c, vec![2, 1, 1]);
        let mut c = vec![3, 3, 3];
        assert!(!advance(&mut c, 3));
    }

    #[test]
    fn simple_equations() {
        assert_eq!(solve("H2 + O2 = H2O").unwrap(), vec![2, 1, 2]);
        assert_eq!(solve("Fe + O2 = Fe2O3").unwrap(), vec![4, 3, 2]);
        assert_eq!(solve("C2H6 + O2 = CO2 + H2O").unwrap(), vec![2, 7, 4, 6]);
        assert_eq!(solve("Al + HCl = AlCl3 + H2").unwrap(), vec![2, 6, 2, 3]);
        assert_eq!(solve("KClO3 = KCl + O2").unwrap(), vec![2, 2, 3]);
        assert_eq!(solve("Ca(OH)2 + HCl -> CaCl2 + H2O").unwrap(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn already_balanced_equation_is_found_first() {
        assert_eq!(solve("NaOH + HCl = NaCl + H2O").unwrap(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn coefficients_above_ceiling_are_not_found() {
        // needs 25 O2
        let err = solve("C8H18 + O2 = CO2 + H2O").unwrap_err();
        assert_eq!(err, BalanceError::SearchExhausted { tried: 10_000 });
    }

    #[test]
    fn exhausted_search_space_reports_combinations() {
        // 15^2 combinations, none conserves both elements
        let err = solve("H2 = O2").unwrap_err();
        assert_eq!(err, BalanceError::SearchExhausted { tried: 225 });
    }

    #[test]
    fn progress_is_traced() {
        let config = BalancerConfig { trial_progress_interval: 100, ..BalancerConfig::default() };
        let (result, steps) = solve_with("C2H6 + O2 = CO2 + H2O", &config);
        assert!(result.is_ok());
        assert_eq!(steps.iter().filter(|s| s.starts_with("Tried")).count(), 47);
        assert!(steps.iter().any(|s| s.starts_with("Found a solution after 4776 iterations")));
    }

    #[test]
    fn small_budget() {
        let config = BalancerConfig { trial_max_iterations: 10, ..BalancerConfig::default() };
        let (result, _) = solve_with("Fe + O2 = Fe2O3", &config);
        assert_eq!(result, Err(BalanceError::SearchExhausted { tried: 10 }));
    }
}
