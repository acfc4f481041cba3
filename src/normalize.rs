//! Min-max normalization of the change signal.

use crate::score::ChangeSignal;

/// Change scores rescaled into `0.0..=1.0`.
///
/// Index `i` still refers to the transition from frame `i` to frame `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSignal(Vec<f64>);

impl NormalizedSignal {
    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no transitions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized values in transition order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Magnitude at `position`, or `0.0` past the end.
    pub fn get(&self, position: usize) -> f64 {
        self.0.get(position).copied().unwrap_or(0.0)
    }
}

impl From<Vec<f64>> for NormalizedSignal {
    /// Wrap pre-normalized values, clamping each into `0.0..=1.0`.
    /// Non-finite values become `0.0`.
    fn from(values: Vec<f64>) -> Self {
        Self(
            values
                .into_iter()
                .map(|value| if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 })
                .collect(),
        )
    }
}

/// Rescale `signal` so its minimum maps to 0 and its maximum to 1.
///
/// A constant signal (including empty and single-entry signals) maps to all
/// zeros.
pub fn normalize(signal: &ChangeSignal) -> NormalizedSignal {
    let values = signal.values();
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return NormalizedSignal::default();
    };

    if max == min {
        return NormalizedSignal(vec![0.0; values.len()]);
    }

    let span = (max - min) as f64;
    NormalizedSignal(
        values
            .iter()
            .map(|&value| (value - min) as f64 / span)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{NormalizedSignal, normalize};
    use crate::score::ChangeSignal;

    #[test]
    fn scales_to_unit_range() {
        let normalized = normalize(&ChangeSignal::from(vec![10, 20, 30]));
        assert_eq!(normalized.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn single_entry_is_zero() {
        let normalized = normalize(&ChangeSignal::from(vec![42]));
        assert_eq!(normalized.values(), &[0.0]);
    }

    #[test]
    fn from_values_clamps() {
        let signal = NormalizedSignal::from(vec![-1.0, 0.25, 2.0, f64::NAN]);
        assert_eq!(signal.values(), &[0.0, 0.25, 1.0, 0.0]);
    }
}
