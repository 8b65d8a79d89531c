pub mod sigmoid;

pub use sigmoid::{activate, activation_slope, sigmoid, sigmoid_derivative};
