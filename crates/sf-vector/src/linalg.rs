//! Local dense helpers applied to a single partition slice.

/// Squared Euclidean norm of a slice.
pub fn squared_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_norm_of_pythagorean_pair() {
        assert_eq!(squared_norm(&[3.0, 4.0]), 25.0);
        assert_eq!(squared_norm(&[]), 0.0);
    }
}
