use ndarray::{Array1, Array2};

pub type Float = f64;
pub type DataVec = Array1<Float>;
pub type WsMat = Array2<Float>;
/// One matrix per layer boundary, index `i` is the `i -> i + 1` boundary
pub type WsBlob = Vec<WsMat>;

/// Mean of a slice, `0.0` for an empty one
pub fn mean(vals: &[Float]) -> Float {
    if vals.is_empty() {
        return 0.0;
    }

    vals.iter().sum::<Float>() / vals.len() as Float
}
