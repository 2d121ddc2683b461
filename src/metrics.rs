use ndarray_stats::QuantileExt;

use crate::learn_params::TestResult;
use crate::util::Float;

/// Share of correctly classified examples.
///
/// Single-output results count as correct when actual and expected values are on the
/// same side of `threshold`; multi-output results when their arg-max positions match.
pub fn accuracy(results: &[TestResult], threshold: Float) -> Float {
    if results.is_empty() {
        return 0.0;
    }

    let correct = results
        .iter()
        .filter(|r| is_correct(r, threshold))
        .count();

    correct as Float / results.len() as Float
}

fn is_correct(r: &TestResult, threshold: Float) -> bool {
    if r.actual_values.len() == 1 && r.expected_values.len() == 1 {
        return (r.actual_values[0] >= threshold) == (r.expected_values[0] >= threshold);
    }

    match (r.actual_values.argmax(), r.expected_values.argmax()) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn result(actual: &[Float], expected: &[Float]) -> TestResult {
        TestResult {
            expected_values: arr1(expected),
            actual_values: arr1(actual),
            outputs_per_layer: vec![],
            raw_per_layer: vec![],
        }
    }

    #[test]
    fn single_output_uses_threshold() {
        let results = vec![
            result(&[0.7], &[1.0]),
            result(&[0.2], &[0.0]),
            result(&[0.6], &[0.0]),
            result(&[0.4], &[1.0]),
        ];

        assert_eq!(accuracy(&results, 0.5), 0.5);
        assert_eq!(accuracy(&results, 0.65), 0.75);
    }

    #[test]
    fn multi_output_uses_argmax() {
        let results = vec![
            result(&[0.1, 0.8, 0.1], &[0.0, 1.0, 0.0]),
            result(&[0.5, 0.3, 0.2], &[0.0, 0.0, 1.0]),
        ];

        assert_eq!(accuracy(&results, 0.5), 0.5);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(accuracy(&[], 0.5), 0.0);
    }
}
