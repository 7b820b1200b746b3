//! Python bindings for the simulation engine.
//!
//! Manifests and results cross the boundary as JSON strings so the Python
//! side can keep its own data classes.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimulationConfig;
use crate::simulation::{self, SimulationError};

create_exception!(flowsim, ManifestValidationError, PyValueError);
create_exception!(flowsim, CyclicDependencyError, PyValueError);
create_exception!(flowsim, ManifestTooLargeError, PyValueError);

fn to_py_err(err: SimulationError) -> PyErr {
    let message = err.to_string();
    match err {
        SimulationError::Validation(_) | SimulationError::Manifest(_) => {
            ManifestValidationError::new_err(message)
        }
        SimulationError::Cycle(_) => CyclicDependencyError::new_err(message),
        SimulationError::ResourceExhausted(_) => ManifestTooLargeError::new_err(message),
        SimulationError::Output(_) => PyValueError::new_err(message),
    }
}

/// Simulate a JSON manifest and return the JSON result.
///
/// # Arguments
/// * `manifest_json` - `{"tasks": [...], "phaseBoundaries": [...]}`
/// * `config_json` - Optional simulation config; missing fields take defaults
///
/// # Raises
/// * ManifestValidationError for malformed or invalid manifests
/// * CyclicDependencyError if the dependency graph has a cycle
/// * ManifestTooLargeError if the manifest exceeds the configured bounds
#[pyfunction]
#[pyo3(name = "simulate_json", signature = (manifest_json, config_json=None))]
fn py_simulate_json(manifest_json: &str, config_json: Option<&str>) -> PyResult<String> {
    let config = match config_json {
        Some(json) => {
            SimulationConfig::from_json(json).map_err(|e| PyValueError::new_err(e.to_string()))?
        }
        None => SimulationConfig::default(),
    };
    simulation::simulate_json(manifest_json, &config).map_err(to_py_err)
}

/// The flowsim Python module.
#[pymodule]
fn flowsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_simulate_json, m)?)?;

    let py = m.py();
    m.add("ManifestValidationError", py.get_type_bound::<ManifestValidationError>())?;
    m.add("CyclicDependencyError", py.get_type_bound::<CyclicDependencyError>())?;
    m.add("ManifestTooLargeError", py.get_type_bound::<ManifestTooLargeError>())?;

    Ok(())
}
