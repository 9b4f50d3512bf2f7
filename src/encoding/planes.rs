//! A dense `[file][rank][plane]` buffer that the codecs fill before handing it to `tch`.

use tch::{Kind, Tensor};
use crate::encoding::constants::{BOARD_SIZE, NUM_SQUARES};
use crate::encoding::CodecError;

#[derive(Clone, Debug, PartialEq)]
pub struct Planes {
    num_planes: usize,
    data: Vec<f32>,
}

impl Planes {
    pub fn zeros(num_planes: usize) -> Planes {
        Planes {
            num_planes,
            data: vec![0.; NUM_SQUARES * num_planes],
        }
    }

    pub fn from_vec(num_planes: usize, data: Vec<f32>) -> Result<Planes, CodecError> {
        if data.len() != NUM_SQUARES * num_planes {
            return Err(CodecError::TensorShape {
                expected: vec![(NUM_SQUARES * num_planes) as i64],
                actual: vec![data.len() as i64],
            });
        }
        Ok(Planes { num_planes, data })
    }

    /// Copies a `[8, 8, num_planes]` tensor into host memory.
    pub fn from_tensor(tensor: &Tensor, num_planes: usize) -> Result<Planes, CodecError> {
        let expected = vec![BOARD_SIZE as i64, BOARD_SIZE as i64, num_planes as i64];
        let actual = tensor.size();
        if actual != expected {
            return Err(CodecError::TensorShape { expected, actual });
        }
        let data = Vec::<f32>::try_from(tensor.to_kind(Kind::Float).flatten(0, -1))?;
        Planes::from_vec(num_planes, data)
    }

    pub fn to_tensor(&self) -> Tensor {
        Tensor::from_slice(&self.data).view([BOARD_SIZE as i64, BOARD_SIZE as i64, self.num_planes as i64])
    }

    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    #[inline]
    fn offset(&self, file: usize, rank: usize, plane: usize) -> usize {
        (file * BOARD_SIZE + rank) * self.num_planes + plane
    }

    #[inline]
    pub fn get(&self, file: usize, rank: usize, plane: usize) -> f32 {
        self.data[self.offset(file, rank, plane)]
    }

    #[inline]
    pub fn set(&mut self, file: usize, rank: usize, plane: usize, value: f32) {
        let offset = self.offset(file, rank, plane);
        self.data[offset] = value;
    }

    pub fn fill_plane(&mut self, plane: usize, value: f32) {
        for file in 0..BOARD_SIZE {
            for rank in 0..BOARD_SIZE {
                self.set(file, rank, plane, value);
            }
        }
    }

    /// Copies all planes of `other` into this buffer starting at `first_plane`.
    pub fn copy_planes_from(&mut self, other: &Planes, first_plane: usize) {
        for file in 0..BOARD_SIZE {
            for rank in 0..BOARD_SIZE {
                for plane in 0..other.num_planes {
                    self.set(file, rank, first_plane + plane, other.get(file, rank, plane));
                }
            }
        }
    }

    /// Extracts `num_planes` consecutive planes starting at `first_plane`.
    pub fn slice_planes(&self, first_plane: usize, num_planes: usize) -> Planes {
        let mut planes = Planes::zeros(num_planes);
        for file in 0..BOARD_SIZE {
            for rank in 0..BOARD_SIZE {
                for plane in 0..num_planes {
                    planes.set(file, rank, plane, self.get(file, rank, first_plane + plane));
                }
            }
        }
        planes
    }

    pub fn plane_is_empty(&self, plane: usize) -> bool {
        (0..BOARD_SIZE).all(|file| (0..BOARD_SIZE).all(|rank| self.get(file, rank, plane) == 0.))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
