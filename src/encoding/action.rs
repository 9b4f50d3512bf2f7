//! Maps moves to the `8×8×73` policy layout: an origin square plus one of 73 move types
//! (56 queen-like, 8 knight, 9 underpromotion).

use std::collections::HashMap;
use chess::{Board, ChessMove, Color, File, Piece, Rank, Square};
use subenum::subenum;
use tch::Tensor;
use crate::encoding::constants::{BOARD_SIZE, KNIGHT_MOVES_OFFSET, MAX_RAY_LENGTH, NUM_ACTIONS, NUM_MOVE_TYPES, NUM_UNDERPROMOTION_DIRECTIONS, UNDERPROMOTIONS_OFFSET};
use crate::encoding::{CodecError, KnightMoveDirection, Planes, QueenLikeMoveDirection};

#[subenum(Underpromotion)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Promotion {
    #[subenum(Underpromotion)]
    Knight,
    #[subenum(Underpromotion)]
    Bishop,
    #[subenum(Underpromotion)]
    Rook,
    Queen,
}

impl Promotion {
    pub fn from_piece(piece: Piece) -> Option<Promotion> {
        match piece {
            Piece::Knight => Some(Promotion::Knight),
            Piece::Bishop => Some(Promotion::Bishop),
            Piece::Rook => Some(Promotion::Rook),
            Piece::Queen => Some(Promotion::Queen),
            _ => None,
        }
    }

    pub fn to_piece(self) -> Piece {
        match self {
            Promotion::Knight => Piece::Knight,
            Promotion::Bishop => Piece::Bishop,
            Promotion::Rook => Piece::Rook,
            Promotion::Queen => Piece::Queen,
        }
    }
}

impl Underpromotion {
    const ALL: [Underpromotion; 3] = [Underpromotion::Knight, Underpromotion::Bishop, Underpromotion::Rook];

    pub fn index(self) -> usize {
        match self {
            Underpromotion::Knight => 0,
            Underpromotion::Bishop => 1,
            Underpromotion::Rook => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Underpromotion> {
        Underpromotion::ALL.get(index).copied()
    }
}

/// A move in policy coordinates: origin file, origin rank and move type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct EncodedMove {
    pub file: u8,
    pub rank: u8,
    pub move_type: u8,
}

impl EncodedMove {
    pub fn new(file: u8, rank: u8, move_type: u8) -> Result<EncodedMove, CodecError> {
        if file as usize >= BOARD_SIZE || rank as usize >= BOARD_SIZE {
            return Err(CodecError::OffBoard { file: file as i32, rank: rank as i32 });
        }
        if move_type as usize >= NUM_MOVE_TYPES {
            return Err(CodecError::InvalidMoveType(move_type as usize));
        }
        Ok(EncodedMove { file, rank, move_type })
    }

    /// Flat index into a `4672` policy vector.
    pub fn index(&self) -> usize {
        (self.file as usize * BOARD_SIZE + self.rank as usize) * NUM_MOVE_TYPES + self.move_type as usize
    }

    pub fn from_index(index: usize) -> Result<EncodedMove, CodecError> {
        if index >= NUM_ACTIONS {
            return Err(CodecError::ActionOutOfRange(index));
        }
        let square = index / NUM_MOVE_TYPES;
        Ok(EncodedMove {
            file: (square / BOARD_SIZE) as u8,
            rank: (square % BOARD_SIZE) as u8,
            move_type: (index % NUM_MOVE_TYPES) as u8,
        })
    }

    pub fn source(&self) -> Square {
        Square::make_square(Rank::from_index(self.rank as usize), File::from_index(self.file as usize))
    }
}

fn square_coords(square: Square) -> (i8, i8) {
    (square.get_file().to_index() as i8, square.get_rank().to_index() as i8)
}

fn square_at(file: i8, rank: i8) -> Result<Square, CodecError> {
    if !(0..BOARD_SIZE as i8).contains(&file) || !(0..BOARD_SIZE as i8).contains(&rank) {
        return Err(CodecError::OffBoard { file: file as i32, rank: rank as i32 });
    }
    Ok(Square::make_square(Rank::from_index(rank as usize), File::from_index(file as usize)))
}

fn forward(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn last_rank(color: Color) -> i8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

/// Encodes a move from its origin, destination and promotion alone.
pub fn encode_move(mv: ChessMove) -> Result<EncodedMove, CodecError> {
    let (src_file, src_rank) = square_coords(mv.get_source());
    let (dst_file, dst_rank) = square_coords(mv.get_dest());
    let (file_delta, rank_delta) = (dst_file - src_file, dst_rank - src_rank);
    let unencodable = || CodecError::UnencodableMove(mv.to_string());

    let promotion = match mv.get_promotion() {
        Some(piece) => Some(Promotion::from_piece(piece).ok_or_else(unencodable)?),
        None => None,
    };

    let move_type = match promotion.and_then(|promotion| Underpromotion::try_from(promotion).ok()) {
        Some(underpromotion) => {
            // a one-step pawn move from the seventh rank of whichever side is moving
            let from_promotion_rank = (rank_delta == 1 && src_rank == 6) || (rank_delta == -1 && src_rank == 1);
            if !from_promotion_rank || file_delta.abs() > 1 {
                return Err(unencodable());
            }
            UNDERPROMOTIONS_OFFSET
                + underpromotion.index() * NUM_UNDERPROMOTION_DIRECTIONS
                + (file_delta + 1) as usize
        }
        None => {
            if let Some((direction, distance)) = QueenLikeMoveDirection::calc_and_measure_distance(file_delta, rank_delta) {
                direction as usize * MAX_RAY_LENGTH + distance as usize - 1
            } else if let (Some(direction), None) = (KnightMoveDirection::calc(file_delta, rank_delta), promotion) {
                KNIGHT_MOVES_OFFSET + direction as usize
            } else {
                return Err(unencodable());
            }
        }
    };

    EncodedMove::new(src_file as u8, src_rank as u8, move_type as u8)
}

/// Inverse of [`encode_move`]. The board supplies the side to move, which fixes the direction of
/// underpromotions, and the moving piece, so that a pawn reaching the last rank through a
/// queen-like move type comes back as a queen promotion.
pub fn decode_move(encoded: EncodedMove, board: &Board) -> Result<ChessMove, CodecError> {
    let EncodedMove { file, rank, move_type } = EncodedMove::new(encoded.file, encoded.rank, encoded.move_type)?;
    let source = encoded.source();
    let side_to_move = board.side_to_move();
    let (file, rank, move_type) = (file as i8, rank as i8, move_type as usize);

    if move_type < KNIGHT_MOVES_OFFSET {
        let direction = QueenLikeMoveDirection::from_index(move_type / MAX_RAY_LENGTH)
            .ok_or(CodecError::InvalidMoveType(move_type))?;
        let distance = (move_type % MAX_RAY_LENGTH + 1) as i8;
        let (df, dr) = direction.offset();
        let dst_rank = rank + dr * distance;
        let dest = square_at(file + df * distance, dst_rank)?;

        let is_pawn = board.piece_on(source) == Some(Piece::Pawn);
        let promotion = if is_pawn && dst_rank == last_rank(side_to_move) {
            Some(Piece::Queen)
        } else {
            None
        };
        Ok(ChessMove::new(source, dest, promotion))
    } else if move_type < UNDERPROMOTIONS_OFFSET {
        let direction = KnightMoveDirection::from_index(move_type - KNIGHT_MOVES_OFFSET)
            .ok_or(CodecError::InvalidMoveType(move_type))?;
        let (df, dr) = direction.offset();
        Ok(ChessMove::new(source, square_at(file + df, rank + dr)?, None))
    } else {
        let underpromotion_type = move_type - UNDERPROMOTIONS_OFFSET;
        let underpromotion = Underpromotion::from_index(underpromotion_type / NUM_UNDERPROMOTION_DIRECTIONS)
            .ok_or(CodecError::InvalidMoveType(move_type))?;
        let df = (underpromotion_type % NUM_UNDERPROMOTION_DIRECTIONS) as i8 - 1;
        let dest = square_at(file + df, rank + forward(side_to_move))?;
        Ok(ChessMove::new(source, dest, Some(Promotion::from(underpromotion).to_piece())))
    }
}

/// Sorted flat action indices of `moves`. Two moves sharing an index is an error.
pub fn legal_actions(moves: &[ChessMove]) -> Result<Vec<usize>, CodecError> {
    let mut seen: HashMap<usize, ChessMove> = HashMap::with_capacity(moves.len());
    for &mv in moves {
        let index = encode_move(mv)?.index();
        if let Some(first) = seen.insert(index, mv) {
            return Err(CodecError::ActionCollision {
                index,
                first: first.to_string(),
                second: mv.to_string(),
            });
        }
    }
    let mut actions: Vec<usize> = seen.into_keys().collect();
    actions.sort_unstable();
    Ok(actions)
}

pub fn action_planes(moves: &[ChessMove]) -> Result<Planes, CodecError> {
    let mut planes = Planes::zeros(NUM_MOVE_TYPES);
    for action in legal_actions(moves)? {
        let encoded = EncodedMove::from_index(action)?;
        planes.set(encoded.file as usize, encoded.rank as usize, encoded.move_type as usize, 1.);
    }
    Ok(planes)
}

/// One-hot `[8, 8, 73]` mask of `moves`.
pub fn encode_actions(moves: &[ChessMove]) -> Result<Tensor, CodecError> {
    Ok(action_planes(moves)?.to_tensor())
}

/// Decodes every set entry of an `[8, 8, 73]` mask back into a move on `board`.
pub fn decode_actions(tensor: &Tensor, board: &Board) -> Result<Vec<ChessMove>, CodecError> {
    let planes = Planes::from_tensor(tensor, NUM_MOVE_TYPES)?;
    let mut moves = Vec::new();
    for file in 0..BOARD_SIZE {
        for rank in 0..BOARD_SIZE {
            for move_type in 0..NUM_MOVE_TYPES {
                if planes.get(file, rank, move_type) != 0. {
                    let encoded = EncodedMove::new(file as u8, rank as u8, move_type as u8)?;
                    moves.push(decode_move(encoded, board)?);
                }
            }
        }
    }
    Ok(moves)
}
