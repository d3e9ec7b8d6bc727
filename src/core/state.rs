use crate::core::Gate;
use crate::core::errors::StateError;
use crate::core::measurements::{Measurement, MeasurementResult};
use crate::core::qubit::{Basis, EncodedQubit};
use crate::core::utils::{dagger, trace};
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

/// Density matrix of a single qubit.
#[derive(Clone, Debug)]
pub struct QubitState {
    pub density_matrix: Array2<Complex64>,
}

impl Default for QubitState {
    fn default() -> Self {
        Self::new()
    }
}

impl QubitState {
    /// Creates a new qubit initialized to |0>.
    pub fn new() -> Self {
        let mut density_matrix = Array2::<Complex64>::zeros((2, 2));
        density_matrix[[0, 0]] = Complex64::new(1.0, 0.0);

        Self { density_matrix }
    }

    /// Prepares `qubit.bit` in `qubit.basis`: X for a one, then H for the
    /// diagonal basis.
    pub fn prepare(qubit: EncodedQubit) -> Self {
        let mut state = Self::new();
        if qubit.bit {
            state.apply(&Gate::x());
        }
        if qubit.basis == Basis::Diagonal {
            state.apply(&Gate::h());
        }
        state
    }

    /// Checks if a QubitState is valid.
    pub fn is_valid(&self) -> Result<(), StateError> {
        let tr = trace(&self.density_matrix);
        if (tr - Complex64::new(1.0, 0.0)).norm() > 1e-12 {
            return Err(StateError::InvalidTrace(tr));
        }
        Ok(())
    }

    /// Applies a single-qubit gate: rho' = U rho U†
    pub fn apply(&mut self, gate: &Gate) {
        let temp = gate.matrix.dot(&self.density_matrix);
        self.density_matrix = temp.dot(&dagger(&gate.matrix));
    }

    /// Returns the probability of each measurement outcome
    pub fn probabilities(&self, measurement: &Measurement) -> Vec<f64> {
        let mut probs: Vec<f64> = measurement
            .operators
            .iter()
            .map(|op| {
                let unnormalized = op.dot(&self.density_matrix).dot(&dagger(op));
                trace(&unnormalized).re.max(0.0)
            })
            .collect();

        // Due to float, renormalization of probabilities to ensure completeness
        let sum: f64 = probs.iter().sum();
        if sum > 0.0 {
            for p in &mut probs {
                *p /= sum;
            }
        }
        probs
    }

    /// Randomly selects operator index ponderating using `probs`
    fn pick_outcome<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
        let roll: f64 = rng.random();

        let mut cumulative = 0.0;
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p;
            if roll < cumulative {
                return i;
            }
        }
        probs.len().saturating_sub(1)
    }

    /// Physical measurement which changes the state irretrievably
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        measurement: &Measurement,
        rng: &mut R,
    ) -> Result<MeasurementResult, StateError> {
        let probs = self.probabilities(measurement);

        let outcome_idx = Self::pick_outcome(&probs, rng);
        let p_selected = probs[outcome_idx];

        if p_selected <= 1e-12 {
            return Err(StateError::ZeroProbabilityOutcome);
        }

        // rho' = (M_k * rho * M_k†) / p_k
        let m_k = &measurement.operators[outcome_idx];
        let numerator = m_k.dot(&self.density_matrix).dot(&dagger(m_k));
        self.density_matrix = numerator.mapv(|val| val / Complex64::new(p_selected, 0.0));

        Ok(MeasurementResult {
            index: outcome_idx,
            probability: p_selected,
        })
    }
}
