//! # Calculators Module
//!
//! The energy-evaluation capability. Surrogate models and ground-truth solvers are backend
//! adapters behind the same [`EnergyCalculator`] trait; nothing in the filters branches on which
//! backend produced an energy.

pub mod single_point;

use crate::core::models::structure::Structure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("Calculator '{calculator}' failed: {message}")]
    Failed {
        calculator: String,
        message: String,
    },

    #[error("Calculator '{calculator}' returned a non-finite energy ({energy})")]
    NonFinite { calculator: String, energy: f64 },
}

/// Attached potential-energy evaluator.
pub trait EnergyCalculator: Send + Sync {
    fn name(&self) -> &str;

    /// Potential energy of `structure`, in eV.
    fn energy(&self, structure: &Structure) -> Result<f64, CalculatorError>;
}

/// Evaluates `structure` and returns it with the result attached.
pub fn attach(
    calculator: &dyn EnergyCalculator,
    structure: Structure,
) -> Result<Structure, CalculatorError> {
    let energy = calculator.energy(&structure)?;
    if !energy.is_finite() {
        return Err(CalculatorError::NonFinite {
            calculator: calculator.name().to_string(),
            energy,
        });
    }
    Ok(structure.with_energy(energy))
}
