use crate::core::errors::MeasurementError;
use crate::core::qubit::Basis;
use crate::core::utils;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;

/// Projective single-qubit measurement.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// Projectors; outcome `k` reads as bit `k == 1`.
    pub operators: Vec<Array2<Complex64>>,
}

impl Measurement {
    pub fn new(operators: Vec<Array2<Complex64>>) -> Result<Self, MeasurementError> {
        if operators.is_empty() {
            return Err(MeasurementError::InvalidDimensions);
        }

        if operators.iter().any(|op| op.dim() != (2, 2)) {
            return Err(MeasurementError::InvalidDimensions);
        }

        if !utils::check_completeness(&operators, 2) {
            return Err(MeasurementError::NotComplete);
        }

        Ok(Self { operators })
    }

    /// Measurement reading bits in the given BB84 basis.
    pub fn in_basis(basis: Basis) -> Measurement {
        match basis {
            Basis::Rectilinear => Self::z_basis(),
            Basis::Diagonal => Self::x_basis(),
        }
    }

    /// Z basis (Computational) -> {|0>, |1>}.
    pub fn z_basis() -> Measurement {
        let v0: Array1<Complex64> = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let v1: Array1<Complex64> = array![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];

        Measurement {
            operators: vec![utils::outer_product(&v0, &v0), utils::outer_product(&v1, &v1)],
        }
    }

    /// X basis (Hadamard) -> {|+>, |->}.
    pub fn x_basis() -> Measurement {
        let inv_sqrt2 = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);

        let v_plus: Array1<Complex64> = array![inv_sqrt2, inv_sqrt2];
        let v_minus: Array1<Complex64> = array![inv_sqrt2, -inv_sqrt2];

        Measurement {
            operators: vec![
                utils::outer_product(&v_plus, &v_plus),
                utils::outer_product(&v_minus, &v_minus),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    /// Applied measurement operator index
    pub index: usize,
    /// Probability of the selected outcome before collapse
    pub probability: f64,
}

impl MeasurementResult {
    pub fn bit(&self) -> bool {
        self.index == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bases_are_complete() {
        assert!(Measurement::new(Measurement::z_basis().operators).is_ok());
        assert!(Measurement::new(Measurement::x_basis().operators).is_ok());
    }

    #[test]
    fn incomplete_set_is_rejected() {
        let mut ops = Measurement::z_basis().operators;
        ops.pop();
        assert!(matches!(
            Measurement::new(ops),
            Err(MeasurementError::NotComplete)
        ));
        assert!(matches!(
            Measurement::new(vec![]),
            Err(MeasurementError::InvalidDimensions)
        ));
    }
}
