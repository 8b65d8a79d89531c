pub mod sgd;

pub use sgd::{GradientScale, Sgd};
