use ndarray::Zip;

use crate::dataloader::TrainingExample;
use crate::util::{DataVec, Float};

/// With minmax normalising values will be between 0..1
pub fn minmax_normalize(data: &mut DataVec) {
    let min = data.fold(Float::MAX, |val_min, val| val_min.min(*val));
    let max = data.fold(Float::MIN, |val_max, val| val_max.max(*val));

    minmax_normalize_params(data, min, max);
}

pub fn minmax_normalize_val(val: Float, min: Float, max: Float) -> Float {
    if max == min {
        return 0.0;
    }

    (val - min) / (max - min)
}

pub fn minmax_normalize_params(data: &mut DataVec, min: Float, max: Float) {
    Zip::from(data).for_each(|el| {
        *el = minmax_normalize_val(*el, min, max);
    });
}

/// Rescales every input column across `examples` into `0..1`.
/// Expected outputs are left as they are.
pub fn minmax_normalize_columns(examples: &mut [TrainingExample]) {
    let cols = match examples.first() {
        Some(e) => e.input_values.len(),
        None => return,
    };

    for col in 0..cols {
        let mut column: DataVec = examples
            .iter()
            .map(|e| e.input_values.get(col).copied().unwrap_or(0.0))
            .collect();

        minmax_normalize(&mut column);

        for (e, val) in examples.iter_mut().zip(column.iter()) {
            if let Some(slot) = e.input_values.get_mut(col) {
                *slot = *val;
            }
        }
    }
}
