use chembalance::{balance_chemical_equation, parse_chemical_formula, BalanceMethod, BalanceRequest, BalanceResult};
use std::fmt::Display;
use wasm_bindgen::prelude::*;


fn balance(equation: &str, method: &str) -> Result<BalanceResult, String> {
    let method = if method.trim().is_empty() {
        BalanceMethod::default()
    } else {
        method.parse::<BalanceMethod>()?
    };
    Ok(balance_chemical_equation(&BalanceRequest::new(equation).with_method(method)))
}

// Export a `equation_io` function from Rust to JavaScript.
#[wasm_bindgen]
/// Process input equation and return output
pub fn equation_io(equation: &str, method: &str) -> String {
    // first char is 1 if success, 0 if error
    match balance(equation, method) {
        Ok(result) if result.is_valid => format!("1{}", result.balanced_equation),
        Ok(result) => format!("0{}", result.error.unwrap_or_default()),
        Err(err) => format!("0{}", err),
    }
}

#[wasm_bindgen]
/// Balance an equation and return the whole result (steps included) as JSON
pub fn balance_json(equation: &str, method: &str) -> String {
    match balance(equation, method) {
        Ok(result) => serde_json::to_string(&result).unwrap_or_else(error_json),
        Err(err) => error_json(err),
    }
}

#[wasm_bindgen]
/// Parse a formula and return its element counts as JSON
pub fn formula_json(formula: &str) -> String {
    serde_json::to_string(&parse_chemical_formula(formula)).unwrap_or_else(error_json)
}

fn error_json<E: Display>(error: E) -> String {
    serde_json::json!({ "is_valid": false, "error": error.to_string() }).to_string()
}
