//! Contains the State struct, which is the main struct for representing a position in a chess game.

use chess::{BitBoard, Board, CastleRights, ChessMove, Color, MoveGen, Piece, Square};

/// A position that was on the board before the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HistoryEntry {
    pub board: Board,
    pub halfmove_clock: u32,
}

/// A position in a chess game together with everything the `chess` crate does not track itself:
/// the positions that led to it, the halfmove (no progress) clock and the ply count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub board: Board,
    pub halfmove_clock: u32,
    pub ply: u32,
    pub(crate) history: Vec<HistoryEntry>,
}

impl State {
    /// Creates an initial state with the standard starting position.
    pub fn initial() -> State {
        State::from_board(Board::default())
    }

    /// Creates a state with no history from a board, with both clocks at zero.
    pub fn from_board(board: Board) -> State {
        State::from_parts(board, 0, 0)
    }

    pub fn from_parts(board: Board, halfmove_clock: u32, ply: u32) -> State {
        State {
            board,
            halfmove_clock,
            ply,
            history: Vec::new(),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn castling_rights(&self, color: Color) -> CastleRights {
        self.board.castle_rights(color)
    }

    /// Gets the fullmove number of the position.
    pub fn fullmove(&self) -> u32 {
        self.ply / 2 + 1
    }

    pub fn calc_legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        self.board.legal(mv)
    }

    /// Number of earlier plies whose positions are still available through `undo`.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of times the current position occurred earlier in the game.
    /// Only positions since the last capture or pawn move can match.
    pub fn repetitions(&self) -> usize {
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .filter(|entry| entry.board == self.board)
            .count()
    }

    pub fn is_repetition(&self, count: usize) -> bool {
        self.repetitions() + 1 >= count
    }

    pub(crate) fn pieces_of(&self, piece: Piece, color: Color) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        match (self.board.piece_on(square), self.board.color_on(square)) {
            (Some(piece), Some(color)) => Some((piece, color)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chess::{File, Rank};
    use super::*;

    #[test]
    fn test_initial() {
        let state = State::initial();
        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.calc_legal_moves().len(), 20);
        assert_eq!(state.fullmove(), 1);
        assert_eq!(state.repetitions(), 0);
        assert!(state.castling_rights(Color::White).has_kingside());
        assert!(state.castling_rights(Color::Black).has_queenside());
    }

    #[test]
    fn test_piece_at() {
        let state = State::initial();
        let e1 = Square::make_square(Rank::First, File::E);
        assert_eq!(state.piece_at(e1), Some((Piece::King, Color::White)));
        let e4 = Square::make_square(Rank::Fourth, File::E);
        assert_eq!(state.piece_at(e4), None);
        assert_eq!(state.pieces_of(Piece::Pawn, Color::Black).popcnt(), 8);
    }
}
