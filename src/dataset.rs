//! Training examples produced by self-play, their on-disk format and conversion to batched tensors.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use bincode::{deserialize_from, serialize_into};
use log::info;
use serde::{Deserialize, Serialize};
use tch::Tensor;
use thiserror::Error;
use crate::encoding::constants::{BOARD_SIZE, NUM_ACTIONS, NUM_POSITION_PLANES, NUM_SQUARES};

pub const STATE_LEN: usize = NUM_SQUARES * NUM_POSITION_PLANES;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset serialization failed: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("dataset version {found} is incompatible with {expected}")]
    Version { found: u32, expected: u32 },
    #[error("example {index} has a {field} of length {len}, expected {expected}")]
    Shape { index: usize, field: &'static str, len: usize, expected: usize },
    #[error("cannot build tensors from an empty batch")]
    EmptyBatch,
}

/// One ply of a finished game: the encoded `8×8×119` position, the visit distribution of the
/// search over all 4672 actions and the game result from the point of view of the side to move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub state: Vec<f32>,
    pub policy: Vec<f32>,
    pub value: f32,
}

#[derive(Deserialize)]
struct DatasetFile {
    version: u32,
    examples: Vec<TrainingExample>,
}

impl DatasetFile {
    const VERSION: u32 = 1;
}

/// Borrowed form of `DatasetFile` for writing; bincode lays a slice out like a `Vec`.
#[derive(Serialize)]
struct DatasetFileRef<'a> {
    version: u32,
    examples: &'a [TrainingExample],
}

pub fn write_examples(path: impl AsRef<Path>, examples: &[TrainingExample]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    let file = DatasetFileRef {
        version: DatasetFile::VERSION,
        examples,
    };
    serialize_into(&mut writer, &file)?;
    writer.flush()?;
    info!("wrote {} examples to {}", examples.len(), path.display());
    Ok(())
}

pub fn read_examples(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>, DatasetError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let file: DatasetFile = deserialize_from(reader)?;
    if file.version != DatasetFile::VERSION {
        return Err(DatasetError::Version {
            found: file.version,
            expected: DatasetFile::VERSION,
        });
    }
    Ok(file.examples)
}

/// Stacks a batch into `([N, 8, 8, 119], [N, 4672], [N, 1])` tensors.
pub fn to_tensors(examples: &[TrainingExample]) -> Result<(Tensor, Tensor, Tensor), DatasetError> {
    if examples.is_empty() {
        return Err(DatasetError::EmptyBatch);
    }

    let mut states = Vec::with_capacity(examples.len() * STATE_LEN);
    let mut policies = Vec::with_capacity(examples.len() * NUM_ACTIONS);
    let mut values = Vec::with_capacity(examples.len());
    for (index, example) in examples.iter().enumerate() {
        if example.state.len() != STATE_LEN {
            return Err(DatasetError::Shape { index, field: "state", len: example.state.len(), expected: STATE_LEN });
        }
        if example.policy.len() != NUM_ACTIONS {
            return Err(DatasetError::Shape { index, field: "policy", len: example.policy.len(), expected: NUM_ACTIONS });
        }
        states.extend_from_slice(&example.state);
        policies.extend_from_slice(&example.policy);
        values.push(example.value);
    }

    let n = examples.len() as i64;
    let board = BOARD_SIZE as i64;
    Ok((
        Tensor::from_slice(&states).view([n, board, board, NUM_POSITION_PLANES as i64]),
        Tensor::from_slice(&policies).view([n, NUM_ACTIONS as i64]),
        Tensor::from_slice(&values).view([n, 1]),
    ))
}
