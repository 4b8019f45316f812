//! Algebraic balancing.
//!
//! The balanced coefficients are a vector of the null space of the stoichiometric matrix.
//! The matrix is reduced with Gauss-Jordan elimination over [`RobustFraction`], so no rounding
//! error can creep into the coefficients. Pivot magnitudes are compared exactly as well.

use super::stoichiometric_matrix;
use crate::equation::ParsedEquation;
use crate::error::{BalanceError, FractionError};
use crate::fraction::RobustFraction;
use log::{debug, warn};
use malachite::num::arithmetic::traits::{Gcd, Lcm, UnsignedAbs};
use malachite::num::basic::traits::{One, Zero};
use malachite::{Integer, Natural};
use std::cmp::{max, min};
use std::mem;

/// Balances an equation through the null space of its stoichiometric matrix
/// # Arguments
/// * `parsed` - equation to balance
/// * `steps` - trace the balancer appends to
/// # Returns
/// * `Ok` - smallest positive integer coefficients (reactants first)
/// * `Err` - if the system has only the trivial solution or the solution is degenerate
pub fn balance(parsed: &ParsedEquation, steps: &mut Vec<String>) -> Result<Vec<u64>, BalanceError> {
    let mut matrix = to_fractions(&stoichiometric_matrix(parsed)?);
    let compounds = parsed.equation.compound_count();
    steps.push(format!(
        "Built {}x{} stoichiometric matrix (rows {}, product columns negated)",
        matrix.len(),
        compounds,
        parsed.elements.join(", "),
    ));

    let pivots = gaussian_elimination(&mut matrix)?;
    let rank = pivots.len();
    steps.push(format!("Reduced the matrix, rank is {}", rank));
    debug!("rank {} for {} compounds, pivot columns {:?}", rank, compounds, pivots);

    if rank == compounds {
        return Err(BalanceError::Overdetermined { rank, compounds });
    }

    let free_columns: Vec<usize> = (0..compounds).filter(|c| !pivots.contains(c)).collect();
    if free_columns.len() > 1 {
        warn!("null space has dimension {}, using the first free variable only", free_columns.len());
        steps.push(format!(
            "Null space has dimension {}, the equation has several independent balances; using the first one",
            free_columns.len(),
        ));
    }

    let free = free_columns[0];
    let solution = null_space_vector(&matrix, &pivots, free)?;
    steps.push(format!(
        "Set coefficient {} to 1 and back-substituted: {}",
        free + 1,
        solution.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", "),
    ));

    let integers = to_smallest_integers(&solution);
    steps.push(format!(
        "Scaled to smallest integers: {}",
        integers.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", "),
    ));

    let coefficients = parsed
        .equation
        .compounds()
        .zip(integers.iter())
        .map(|(compound, value)| {
            if *value <= Integer::ZERO {
                return Err(BalanceError::NonPositiveCoefficient { formula: compound.formula.clone() });
            }
            u64::try_from(value).map_err(|_| BalanceError::CoefficientOverflow { formula: compound.formula.clone() })
        })
        .collect::<Result<Vec<u64>, BalanceError>>()?;

    // conservation is checked again on the integers, guarding against degenerate systems
    let matrix = stoichiometric_matrix(parsed)?;
    for (row, element) in matrix.iter().zip(parsed.elements.iter()) {
        let total: i128 = row.iter().zip(coefficients.iter()).map(|(&a, &c)| i128::from(a) * i128::from(c)).sum();
        if total != 0 {
            return Err(BalanceError::Unbalanced {
                element: element.clone(),
                reactants: side_total(row, &coefficients, true),
                products: side_total(row, &coefficients, false),
            });
        }
    }
    steps.push(format!("Validated conservation of {} element(s)", parsed.elements.len()));

    Ok(coefficients)
}

fn side_total(row: &[i64], coefficients: &[u64], reactants: bool) -> u128 {
    row.iter()
        .zip(coefficients)
        .filter(|(&a, _)| if reactants { a > 0 } else { a < 0 })
        .map(|(&a, &c)| u128::from(a.unsigned_abs()) * u128::from(c))
        .sum()
}

fn to_fractions(matrix: &[Vec<i64>]) -> Vec<Vec<RobustFraction>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&x| RobustFraction::from(x)).collect())
        .collect()
}

/// Reduces the matrix to reduced row echelon form
///
/// For every column the row (from the current row down) with the largest magnitude is used as
/// pivot. Columns without a non-zero pivot are skipped and become free variables.
/// # Returns
/// * pivot column of every pivot row, in row order (its length is the rank)
pub fn gaussian_elimination(matrix: &mut [Vec<RobustFraction>]) -> Result<Vec<usize>, FractionError> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, |r| r.len());
    let mut pivots = Vec::new();
    let mut row = 0;

    for col in 0..cols {
        if row >= rows { break; }

        let mut i_max = row;
        let mut max_magnitude = matrix[row][col].abs();
        for (i, row_n) in matrix.iter().enumerate().skip(row + 1) {
            let magnitude = row_n[col].abs();
            if magnitude > max_magnitude {
                i_max = i;
                max_magnitude = magnitude;
            }
        }
        if matrix[i_max][col].is_zero() { continue; }

        swap_rows(row, i_max, matrix);

        let pivot = matrix[row][col].clone();
        for value in matrix[row].iter_mut() {
            *value = value.divide(&pivot)?;
        }

        for i in 0..rows {
            if i == row || matrix[i][col].is_zero() { continue; }
            let factor = matrix[i][col].clone();
            for j in 0..cols {
                let updated = matrix[i][j].subtract(&factor.multiply(&matrix[row][j]));
                matrix[i][j] = updated;
            }
        }

        pivots.push(col);
        row += 1;
    }

    Ok(pivots)
}

/// Swaps two rows in a matrix
#[inline(always)]
pub fn swap_rows<T>(r1: usize, r2: usize, matrix: &mut [Vec<T>]) {
    if r1 != r2 {
        let bigger_r = max(r1, r2);
        let smaller_r = min(r1, r2);
        let (top, bot) = matrix.split_at_mut(bigger_r);  // index 0 in bot is bigger_r
        mem::swap(&mut top[smaller_r], &mut bot[0])
    }
}

/// Null space vector with the `free` variable set to 1 and every other free variable set to 0
///
/// Pivot variables are back-substituted from the last pivot row to the first.
pub fn null_space_vector(matrix: &[Vec<RobustFraction>], pivots: &[usize], free: usize) -> Result<Vec<RobustFraction>, FractionError> {
    let cols = matrix.first().map_or(0, |r| r.len());
    let mut solution = vec![RobustFraction::zero(); cols];
    solution[free] = RobustFraction::one();

    for (row, &pivot_col) in pivots.iter().enumerate().rev() {
        let mut sum = RobustFraction::zero();
        for (col, value) in matrix[row].iter().enumerate() {
            if col != pivot_col {
                sum = sum.add(&value.multiply(&solution[col]));
            }
        }
        solution[pivot_col] = sum.negate().divide(&matrix[row][pivot_col])?;
    }

    Ok(solution)
}

/// Scales a rational vector to the smallest integer vector with the same direction
///
/// A vector without positive components is negated first. Denominators are cleared with their
/// least common multiple, then the result is divided by the greatest common divisor.
pub fn to_smallest_integers(vector: &[RobustFraction]) -> Vec<Integer> {
    let flip = vector.iter().all(|x| !x.is_positive());

    let mut lcm = Natural::ONE;
    for x in vector.iter() {
        lcm = lcm.lcm(x.denominator().clone());
    }

    let integers: Vec<Integer> = vector
        .iter()
        .map(|x| {
            let value = x.numerator() * &Integer::from(&lcm / x.denominator());
            if flip { -value } else { value }
        })
        .collect();

    let mut divisor = Natural::ZERO;
    for value in integers.iter() {
        divisor = divisor.gcd(value.unsigned_abs());
    }
    if divisor <= Natural::ONE {
        return integers;
    }

    let divisor = Integer::from(divisor);
    integers.into_iter().map(|value| value / &divisor).collect()
}
