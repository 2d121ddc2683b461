use std::error::Error;
use std::fs::{self, File};
use std::io::Write;

use log::info;
use prost::Message;

use crate::err::{NetError, NetResult};
use crate::network::Network;
use crate::util::{WsBlob, WsMat};

#[derive(Clone, PartialEq, Message)]
pub struct PbBuf {
    #[prost(double, repeated, tag = "1")]
    pub vals: Vec<f64>,
    #[prost(uint32, repeated, tag = "2")]
    pub shape: Vec<u32>,
}

/// Weight matrices of every layer boundary, input side first
#[derive(Clone, PartialEq, Message)]
pub struct PbNetworkState {
    #[prost(message, repeated, tag = "1")]
    pub boundaries: Vec<PbBuf>,
}

pub fn convert_ws_to_pb(ws: &WsMat) -> PbBuf {
    PbBuf {
        vals: ws.iter().copied().collect(),
        shape: ws.shape().iter().map(|s| *s as u32).collect(),
    }
}

pub fn convert_pb_to_ws(pb_buf: &PbBuf) -> NetResult<WsMat> {
    if pb_buf.shape.len() != 2 {
        return Err(NetError::InvalidFormat(format!(
            "expected 2 dimensional weights, got {} dimensions",
            pb_buf.shape.len()
        )));
    }

    let shape = (pb_buf.shape[0] as usize, pb_buf.shape[1] as usize);

    WsMat::from_shape_vec(shape, pb_buf.vals.clone())
        .map_err(|e| NetError::InvalidFormat(format!("invalid weights buffer : {}", e)))
}

impl Network {
    pub fn encode_state(&self) -> Vec<u8> {
        let pb_state = PbNetworkState {
            boundaries: self.weights().iter().map(convert_ws_to_pb).collect(),
        };

        pb_state.encode_to_vec()
    }

    /// Replaces all weights from an encoded state.
    /// Nothing is written unless every boundary matches the current topology.
    pub fn decode_state(&mut self, buf: &[u8]) -> NetResult<()> {
        let pb_state = PbNetworkState::decode(buf)
            .map_err(|e| NetError::InvalidFormat(format!("invalid state : {}", e)))?;

        let blob = pb_state
            .boundaries
            .iter()
            .map(convert_pb_to_ws)
            .collect::<NetResult<WsBlob>>()?;

        let current = self.weights();

        if blob.len() != current.len() {
            return Err(NetError::ArraySizeMismatch {
                expected: current.len(),
                actual: blob.len(),
            });
        }

        for (loaded, cur) in blob.iter().zip(current.iter()) {
            if loaded.dim() != cur.dim() {
                return Err(NetError::WeightVectorSizeMismatch {
                    expected: cur.len(),
                    actual: loaded.len(),
                });
            }
        }

        for (idx, ws) in blob.iter().enumerate() {
            self.set_layer_weights(idx, ws)?;
        }

        Ok(())
    }

    pub fn save_state(&self, filepath: &str) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(filepath)?;
        file.write_all(self.encode_state().as_slice())?;

        info!("Saved weights state to {}", filepath);

        Ok(())
    }

    pub fn load_state(&mut self, filepath: &str) -> Result<(), Box<dyn Error>> {
        let buf = fs::read(filepath)?;
        self.decode_state(buf.as_slice())?;

        Ok(())
    }
}
