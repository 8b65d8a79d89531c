use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layer widths of the fixed input → hidden1 → hidden2 → output network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden1: usize,
    pub hidden2: usize,
    pub outputs: usize,
}

impl Topology {
    /// Builds a topology, rejecting any zero-width layer.
    pub fn new(
        inputs: usize,
        hidden1: usize,
        hidden2: usize,
        outputs: usize,
    ) -> Result<Topology, ConfigError> {
        let widths = [
            ("inputs", inputs),
            ("hidden1", hidden1),
            ("hidden2", hidden2),
            ("outputs", outputs),
        ];
        if let Some(&(layer, _)) = widths.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::ZeroWidth { layer });
        }

        Ok(Topology { inputs, hidden1, hidden2, outputs })
    }

    /// Shapes of W1, W2, W3 in order.
    pub fn weight_shapes(&self) -> [(usize, usize); 3] {
        [
            (self.inputs, self.hidden1),
            (self.hidden1, self.hidden2),
            (self.hidden2, self.outputs),
        ]
    }
}
