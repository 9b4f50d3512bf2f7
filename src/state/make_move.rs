//! Contains the implementation of the `State::make_move` and `State::undo` methods.

use chess::{ChessMove, Piece};
use crate::state::{HistoryEntry, State, StateError};

impl State {
    /// Plays a legal move, pushing the current position onto the history.
    pub fn make_move(&mut self, mv: ChessMove) -> Result<(), StateError> {
        if !self.board.legal(mv) {
            return Err(StateError::IllegalMove(mv.to_string()));
        }

        let is_pawn_move = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        let is_capture = self.board.piece_on(mv.get_dest()).is_some();

        self.history.push(HistoryEntry {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
        });

        self.board = self.board.make_move_new(mv);
        self.halfmove_clock = if is_pawn_move || is_capture { 0 } else { self.halfmove_clock + 1 };
        self.ply += 1;
        Ok(())
    }

    /// Returns the state reached by playing `mv`, leaving `self` untouched.
    pub fn apply_move(&self, mv: ChessMove) -> Result<State, StateError> {
        let mut next = self.clone();
        next.make_move(mv)?;
        Ok(next)
    }

    /// Steps back one ply. Returns false if there is no earlier position to step back to.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(entry) => {
                self.board = entry.board;
                self.halfmove_clock = entry.halfmove_clock;
                self.ply = self.ply.saturating_sub(1);
                true
            }
            None => false,
        }
    }
}
