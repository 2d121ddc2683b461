use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::err::NetError;
use crate::util::Float;

pub fn sigmoid(val: Float) -> Float {
    1.0 / (1.0 + (-val).exp())
}

pub fn sigmoid_deriv(val: Float) -> Float {
    let y = sigmoid(val);
    y * (1.0 - y)
}

/// `(1 - e^-x) / (1 + e^-x)`, odd and bounded by `(-1, 1)`.
/// Uses `e^-x` in both terms, `(1 - e^x) / (1 + e^-x)` is neither odd nor bounded.
pub fn sigmoid_bipolar(val: Float) -> Float {
    (1.0 - (-val).exp()) / (1.0 + (-val).exp())
}

pub fn sigmoid_bipolar_deriv(val: Float) -> Float {
    let y = sigmoid_bipolar(val);
    1.0 - y * y
}

pub fn tanh(val: Float) -> Float {
    val.tanh()
}

pub fn tanh_deriv(val: Float) -> Float {
    let y = tanh(val);
    1.0 - y * y
}

pub fn relu(val: Float) -> Float {
    val.max(0.0)
}

pub fn relu_deriv(val: Float) -> Float {
    if val <= 0.0 {
        0.0
    } else {
        1.0
    }
}

/// Activation applied to every non-input layer.
///
/// Both [`ActivationFunction::function`] and [`ActivationFunction::derivative`]
/// take the raw (pre-activation) value. Derivatives written in terms of the
/// output `y` evaluate `y = f(x)` themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    SigmoidBipolar,
    Tanh,
    ReLU,
}

type ActivationEntry = (&'static str, ActivationFunction, fn(Float) -> Float, fn(Float) -> Float);

static ACTIVATIONS: [ActivationEntry; 4] = [
    ("Sigmoid", ActivationFunction::Sigmoid, sigmoid, sigmoid_deriv),
    ("SigmoidBipolar", ActivationFunction::SigmoidBipolar, sigmoid_bipolar, sigmoid_bipolar_deriv),
    ("Tanh", ActivationFunction::Tanh, tanh, tanh_deriv),
    ("ReLU", ActivationFunction::ReLU, relu, relu_deriv),
];

impl ActivationFunction {
    fn entry(&self) -> &'static ActivationEntry {
        match self {
            ActivationFunction::Sigmoid => &ACTIVATIONS[0],
            ActivationFunction::SigmoidBipolar => &ACTIVATIONS[1],
            ActivationFunction::Tanh => &ACTIVATIONS[2],
            ActivationFunction::ReLU => &ACTIVATIONS[3],
        }
    }

    pub fn function(&self, x: Float) -> Float {
        (self.entry().2)(x)
    }

    pub fn derivative(&self, x: Float) -> Float {
        (self.entry().3)(x)
    }

    /// Stable name used for persistence
    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    pub fn from_name(name: &str) -> Result<Self, NetError> {
        ACTIVATIONS
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|(_, a, ..)| *a)
            .ok_or_else(|| NetError::UnknownActivation(name.to_owned()))
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ACTIVATIONS.iter().map(|(n, ..)| *n)
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationFunction::from_name(s)
    }
}

impl Serialize for ActivationFunction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ActivationFunction {
    fn deserialize<D>(deserializer: D) -> Result<ActivationFunction, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        ActivationFunction::from_name(&name).map_err(serde::de::Error::custom)
    }
}
