//! Position codec: a state with up to seven plies of history becomes an `8×8×119` tensor of
//! eight `8×8×14` snapshots followed by seven scalar planes.

use chess::{Board, BoardBuilder, CastleRights, Color, File, Piece, Rank, Square, ALL_PIECES};
use tch::Tensor;
use crate::encoding::constants::*;
use crate::encoding::{CodecError, Planes};
use crate::state::State;

fn castle_rights_from_flags(kingside: bool, queenside: bool) -> CastleRights {
    match (kingside, queenside) {
        (true, true) => CastleRights::Both,
        (true, false) => CastleRights::KingSide,
        (false, true) => CastleRights::QueenSide,
        (false, false) => CastleRights::NoRights,
    }
}

fn flag(value: bool) -> f32 {
    if value { 1. } else { 0. }
}

/// Piece and repetition planes of `state`, from the point of view of its side to move.
pub fn snapshot_planes(state: &State) -> Planes {
    let mut planes = Planes::zeros(NUM_SNAPSHOT_PLANES);
    let side_to_move = state.side_to_move();

    for (piece_index, piece) in ALL_PIECES.iter().enumerate() {
        for square in state.pieces_of(*piece, side_to_move) {
            planes.set(square.get_file().to_index(), square.get_rank().to_index(), piece_index, 1.);
        }
        for square in state.pieces_of(*piece, !side_to_move) {
            planes.set(square.get_file().to_index(), square.get_rank().to_index(), NUM_PIECE_TYPES + piece_index, 1.);
        }
    }

    let repetitions = state.repetitions().min(MAX_REPETITION_COUNT);
    if repetitions > 0 {
        planes.fill_plane(NUM_PIECE_PLANES, repetitions as f32);
        planes.fill_plane(NUM_PIECE_PLANES + 1, repetitions as f32);
    }
    planes
}

pub fn encode_snapshot(state: &State) -> Result<Tensor, CodecError> {
    Ok(snapshot_planes(state).to_tensor())
}

/// Full `8×8×119` encoding of `state`. History is read from a copy, so `state` is left untouched.
pub fn position_planes(state: &State) -> Planes {
    let mut planes = Planes::zeros(NUM_POSITION_PLANES);

    let mut snapshot_state = state.clone();
    for snapshot in 0..NUM_SNAPSHOTS {
        planes.copy_planes_from(&snapshot_planes(&snapshot_state), snapshot * NUM_SNAPSHOT_PLANES);
        if !snapshot_state.undo() {
            break;
        }
    }

    let side_to_move = state.side_to_move();
    let own_rights = state.castling_rights(side_to_move);
    let opponent_rights = state.castling_rights(!side_to_move);
    planes.fill_plane(SIDE_TO_MOVE_PLANE, flag(side_to_move == Color::White));
    planes.fill_plane(PLY_PLANE, state.ply as f32);
    planes.fill_plane(OWN_KINGSIDE_CASTLING_PLANE, flag(own_rights.has_kingside()));
    planes.fill_plane(OWN_QUEENSIDE_CASTLING_PLANE, flag(own_rights.has_queenside()));
    planes.fill_plane(OPPONENT_KINGSIDE_CASTLING_PLANE, flag(opponent_rights.has_kingside()));
    planes.fill_plane(OPPONENT_QUEENSIDE_CASTLING_PLANE, flag(opponent_rights.has_queenside()));
    planes.fill_plane(HALFMOVE_CLOCK_PLANE, state.halfmove_clock as f32);
    planes
}

pub fn encode(state: &State) -> Result<Tensor, CodecError> {
    Ok(position_planes(state).to_tensor())
}

/// Pieces found in the 12 piece planes starting at `first_plane`, as `(square, piece, is_own)`.
fn read_pieces(planes: &Planes, first_plane: usize) -> Result<Vec<(Square, Piece, bool)>, CodecError> {
    let mut pieces = Vec::new();
    for file in 0..BOARD_SIZE {
        for rank in 0..BOARD_SIZE {
            let square = Square::make_square(Rank::from_index(rank), File::from_index(file));
            let mut claimed_by: Option<usize> = None;
            for plane in 0..NUM_PIECE_PLANES {
                let value = planes.get(file, rank, first_plane + plane);
                if value == 0. {
                    continue;
                }
                if value != 1. {
                    return Err(CodecError::NonBinaryPlane { plane: first_plane + plane, square: square.to_string(), value });
                }
                if let Some(first) = claimed_by {
                    return Err(CodecError::SquareConflict {
                        square: square.to_string(),
                        first: first_plane + first,
                        second: first_plane + plane,
                    });
                }
                claimed_by = Some(plane);
                pieces.push((square, ALL_PIECES[plane % NUM_PIECE_TYPES], plane < NUM_PIECE_TYPES));
            }
        }
    }
    Ok(pieces)
}

/// Drops castling rights that the king and rook placement cannot support.
fn supported_castle_rights(builder: &BoardBuilder, color: Color, rights: CastleRights) -> CastleRights {
    let back_rank = match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    let has = |file: File, piece: Piece| builder[Square::make_square(back_rank, file)] == Some((piece, color));

    if !has(File::E, Piece::King) {
        return CastleRights::NoRights;
    }
    castle_rights_from_flags(
        rights.has_kingside() && has(File::H, Piece::Rook),
        rights.has_queenside() && has(File::A, Piece::Rook),
    )
}

fn build_board(
    pieces: &[(Square, Piece, bool)],
    side_to_move: Color,
    own_rights: CastleRights,
    opponent_rights: CastleRights,
) -> Result<Board, CodecError> {
    let mut builder = BoardBuilder::new();
    for &(square, piece, is_own) in pieces {
        let color = if is_own { side_to_move } else { !side_to_move };
        builder.piece(square, piece, color);
    }
    let own_rights = supported_castle_rights(&builder, side_to_move, own_rights);
    let opponent_rights = supported_castle_rights(&builder, !side_to_move, opponent_rights);
    builder
        .side_to_move(side_to_move)
        .castle_rights(side_to_move, own_rights)
        .castle_rights(!side_to_move, opponent_rights);

    Board::try_from(&builder).map_err(|err| CodecError::InvalidBoard(format!("{:?}", err)))
}

/// Rebuilds a single snapshot. Castling rights and clocks are not part of a snapshot and come back empty.
pub fn decode_snapshot(tensor: &Tensor, side_to_move: Color) -> Result<State, CodecError> {
    let planes = Planes::from_tensor(tensor, NUM_SNAPSHOT_PLANES)?;
    let pieces = read_pieces(&planes, 0)?;
    let board = build_board(&pieces, side_to_move, CastleRights::NoRights, CastleRights::NoRights)?;
    Ok(State::from_board(board))
}

/// Rebuilds the position of the oldest snapshot that holds any piece. Snapshot `i` lies `i` plies
/// in the past, so its side to move is the current one flipped `i` times and both counters are
/// wound back by `i`. The result carries no history.
pub fn decode(tensor: &Tensor) -> Result<State, CodecError> {
    let planes = Planes::from_tensor(tensor, NUM_POSITION_PLANES)?;

    let oldest = (0..NUM_SNAPSHOTS)
        .rev()
        .find(|&snapshot| {
            let first_plane = snapshot * NUM_SNAPSHOT_PLANES;
            (first_plane..first_plane + NUM_PIECE_PLANES).any(|plane| !planes.plane_is_empty(plane))
        })
        .ok_or_else(|| CodecError::InvalidBoard("no snapshot holds any piece".to_string()))?;

    let scalar = |plane: usize| planes.get(0, 0, plane);
    let current_side = if scalar(SIDE_TO_MOVE_PLANE) >= 0.5 { Color::White } else { Color::Black };
    let snapshot_side = if oldest % 2 == 0 { current_side } else { !current_side };

    // castling planes are relative to the current side to move
    let current_rights = castle_rights_from_flags(
        scalar(OWN_KINGSIDE_CASTLING_PLANE) >= 0.5,
        scalar(OWN_QUEENSIDE_CASTLING_PLANE) >= 0.5,
    );
    let other_rights = castle_rights_from_flags(
        scalar(OPPONENT_KINGSIDE_CASTLING_PLANE) >= 0.5,
        scalar(OPPONENT_QUEENSIDE_CASTLING_PLANE) >= 0.5,
    );
    let (own_rights, opponent_rights) = if snapshot_side == current_side {
        (current_rights, other_rights)
    } else {
        (other_rights, current_rights)
    };

    let pieces = read_pieces(&planes, oldest * NUM_SNAPSHOT_PLANES)?;
    let board = build_board(&pieces, snapshot_side, own_rights, opponent_rights)?;

    let ply = scalar(PLY_PLANE).max(0.).round() as u32;
    let halfmove_clock = scalar(HALFMOVE_CLOCK_PLANE).max(0.).round() as u32;
    Ok(State::from_parts(
        board,
        halfmove_clock.saturating_sub(oldest as u32),
        ply.saturating_sub(oldest as u32),
    ))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use chess::ChessMove;
    use super::*;

    fn play(state: &mut State, moves: &[&str]) {
        for uci in moves {
            state.make_move(ChessMove::from_str(uci).unwrap()).unwrap();
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        for fen in [
            "8/8/4k3/8/8/3K4/3R4/8 w - - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            "8/1P4k1/8/8/8/8/1p4K1/8 b - - 0 1",
        ] {
            let state = State::from_fen(fen).unwrap();
            let tensor = encode_snapshot(&state).unwrap();
            assert_eq!(tensor.size(), vec![8, 8, 14]);
            let decoded = decode_snapshot(&tensor, state.side_to_move()).unwrap();
            assert_eq!(decoded.board, state.board, "{}", fen);
        }
    }

    #[test]
    fn test_encode_initial() {
        let planes = position_planes(&State::initial());
        assert_eq!(planes.num_planes(), 119);
        // e2 pawn is own, e7 pawn is opponent's
        assert_eq!(planes.get(4, 1, 0), 1.);
        assert_eq!(planes.get(4, 6, 6), 1.);
        assert_eq!(planes.get(4, 0, 5), 1.);
        assert_eq!(planes.get(3, 7, 10), 1.);
        for plane in NUM_SNAPSHOT_PLANES..NUM_HISTORY_PLANES {
            assert!(planes.plane_is_empty(plane));
        }
        assert_eq!(planes.get(3, 3, SIDE_TO_MOVE_PLANE), 1.);
        assert_eq!(planes.get(3, 3, PLY_PLANE), 0.);
        for plane in OWN_KINGSIDE_CASTLING_PLANE..=OPPONENT_QUEENSIDE_CASTLING_PLANE {
            assert_eq!(planes.get(5, 2, plane), 1.);
        }
        assert!(planes.plane_is_empty(HALFMOVE_CLOCK_PLANE));

        let tensor = encode(&State::initial()).unwrap();
        assert_eq!(tensor.size(), vec![8, 8, 119]);
    }

    #[test]
    fn test_snapshots_are_relative_to_their_own_side() {
        let mut state = State::initial();
        play(&mut state, &["e2e4"]);
        let before = state.clone();
        let planes = position_planes(&state);
        assert_eq!(state, before);

        // black to move: black pawns are own
        assert_eq!(planes.get(4, 6, 0), 1.);
        assert_eq!(planes.get(4, 3, 6), 1.);
        // previous snapshot is white to move
        assert_eq!(planes.get(4, 1, NUM_SNAPSHOT_PLANES), 1.);
        assert_eq!(planes.get(4, 3, NUM_SNAPSHOT_PLANES + 6), 0.);
        assert!(planes.plane_is_empty(2 * NUM_SNAPSHOT_PLANES));

        assert_eq!(planes.get(0, 0, SIDE_TO_MOVE_PLANE), 0.);
        assert_eq!(planes.get(0, 0, PLY_PLANE), 1.);
    }

    #[test]
    fn test_repetition_planes() {
        let mut state = State::initial();
        for _ in 0..2 {
            play(&mut state, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        }
        let planes = position_planes(&state);
        assert_eq!(planes.get(0, 0, 12), 2.);
        assert_eq!(planes.get(7, 7, 13), 2.);
        // four plies back the start position had been seen once
        assert_eq!(planes.get(0, 0, 4 * NUM_SNAPSHOT_PLANES + 12), 1.);
        // one ply back: knights on g1 and f6, seen once before
        assert_eq!(planes.get(0, 0, NUM_SNAPSHOT_PLANES + 12), 1.);
        assert!(planes.plane_is_empty(7 * NUM_SNAPSHOT_PLANES + 12));
        assert_eq!(planes.get(0, 0, HALFMOVE_CLOCK_PLANE), 8.);
    }

    #[test]
    fn test_decode_uses_oldest_snapshot() {
        let mut state = State::initial();
        play(&mut state, &["e2e4", "e7e5", "g1f3"]);
        let decoded = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(decoded, State::initial());

        let decoded = decode(&encode(&State::initial()).unwrap()).unwrap();
        assert_eq!(decoded, State::initial());
    }

    #[test]
    fn test_decode_parity() {
        let mut state = State::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 10").unwrap();
        play(&mut state, &["a1a2", "e8e7"]);
        // two plies in: oldest snapshot is snapshot 2, white to move again
        let decoded = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(decoded.side_to_move(), Color::White);
        assert_eq!(decoded.ply, 18);
        assert_eq!(decoded.board.piece_on(Square::A1), Some(Piece::Rook));
        // the right was lost by the rook move and is not restored
        assert_eq!(decoded.castling_rights(Color::White), CastleRights::NoRights);

        let mut state = State::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 5 1").unwrap();
        play(&mut state, &["a1a2"]);
        let decoded = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(decoded.side_to_move(), Color::White);
        assert_eq!(decoded.halfmove_clock, 5);
        assert_eq!(decoded.ply, 0);
    }

    #[test]
    fn test_unsupported_castling_is_dropped() {
        let state = State::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut planes = position_planes(&state);
        planes.fill_plane(OWN_KINGSIDE_CASTLING_PLANE, 1.);
        planes.fill_plane(OPPONENT_QUEENSIDE_CASTLING_PLANE, 1.);
        let decoded = decode(&planes.to_tensor()).unwrap();
        assert_eq!(decoded.castling_rights(Color::White), CastleRights::NoRights);
        assert_eq!(decoded.castling_rights(Color::Black), CastleRights::NoRights);
    }

    #[test]
    fn test_square_conflict() {
        let mut planes = snapshot_planes(&State::initial());
        planes.set(4, 1, 6, 1.);
        let result = decode_snapshot(&planes.to_tensor(), Color::White);
        assert!(matches!(result, Err(CodecError::SquareConflict { first: 0, second: 6, .. })));
    }

    #[test]
    fn test_non_binary_plane() {
        let mut planes = snapshot_planes(&State::initial());
        planes.set(4, 3, 0, 0.5);
        let result = decode_snapshot(&planes.to_tensor(), Color::White);
        assert!(matches!(result, Err(CodecError::NonBinaryPlane { .. })));
    }

    #[test]
    fn test_empty_tensor() {
        let tensor = Planes::zeros(NUM_POSITION_PLANES).to_tensor();
        assert!(matches!(decode(&tensor), Err(CodecError::InvalidBoard(_))));
    }
}
