use chess::{BoardStatus, Color, Piece, EMPTY};
use crate::state::State;

const FIFTY_MOVE_RULE_HALFMOVES: u32 = 100;

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule
}

impl Termination {
    pub fn is_decisive(&self) -> bool {
        self == &Termination::Checkmate
    }

    pub fn is_draw(&self) -> bool {
        !self.is_decisive()
    }
}

/// Result of a finished game.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Outcome {
    Win(Color),
    Draw,
}

impl Outcome {
    /// +1 if `color` won, -1 if it lost, 0 for a draw.
    pub fn value_for(&self, color: Color) -> f32 {
        match self {
            Outcome::Win(winner) if *winner == color => 1.,
            Outcome::Win(_) => -1.,
            Outcome::Draw => 0.,
        }
    }
}

impl State {
    pub fn termination(&self) -> Option<Termination> {
        match self.board.status() {
            BoardStatus::Checkmate => return Some(Termination::Checkmate),
            BoardStatus::Stalemate => return Some(Termination::Stalemate),
            BoardStatus::Ongoing => {}
        }

        if self.has_insufficient_material() {
            Some(Termination::InsufficientMaterial)
        } else if self.repetitions() >= 2 {
            Some(Termination::ThreefoldRepetition)
        } else if self.halfmove_clock >= FIFTY_MOVE_RULE_HALFMOVES {
            Some(Termination::FiftyMoveRule)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.termination().is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.termination().map(|termination| match termination {
            // the side to move is the one that got mated
            Termination::Checkmate => Outcome::Win(!self.side_to_move()),
            _ => Outcome::Draw,
        })
    }

    /// Bare kings, a single minor piece, or bishops that all live on one square colour.
    pub fn has_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = *board.pieces(Piece::Knight);
        let bishops = *board.pieces(Piece::Bishop);
        let num_minors = (knights | bishops).popcnt();
        if num_minors <= 1 {
            return true;
        }
        if knights != EMPTY {
            return false;
        }

        let mut square_colours = bishops.map(|square| (square.get_rank().to_index() + square.get_file().to_index()) % 2);
        match square_colours.next() {
            Some(first) => square_colours.all(|colour| colour == first),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use chess::ChessMove;
    use super::*;

    #[test]
    fn test_checkmate() {
        let mut state = State::initial();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            state.make_move(ChessMove::from_str(uci).unwrap()).unwrap();
        }
        assert_eq!(state.termination(), Some(Termination::Checkmate));
        assert_eq!(state.outcome(), Some(Outcome::Win(Color::Black)));
        assert_eq!(state.outcome().unwrap().value_for(Color::White), -1.);
        assert_eq!(state.outcome().unwrap().value_for(Color::Black), 1.);
    }

    #[test]
    fn test_stalemate() {
        let state = State::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(state.termination(), Some(Termination::Stalemate));
        assert_eq!(state.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_insufficient_material() {
        assert!(State::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap().has_insufficient_material());
        assert!(State::from_fen("8/8/4k3/8/8/3KN3/8/8 w - - 0 1").unwrap().has_insufficient_material());
        // both bishops on dark squares
        assert!(State::from_fen("8/8/4k3/8/2b5/3K4/2B5/8 w - - 0 1").unwrap().has_insufficient_material());
        assert!(!State::from_fen("8/8/4k3/8/8/3KNN2/8/8 w - - 0 1").unwrap().has_insufficient_material());
        assert!(!State::from_fen("8/8/4k3/8/8/3K4/3P4/8 w - - 0 1").unwrap().has_insufficient_material());
        assert!(!State::initial().has_insufficient_material());
    }

    #[test]
    fn test_fifty_move_rule() {
        let state = State::from_fen("8/8/4k3/8/8/3K4/3R4/8 w - - 100 80").unwrap();
        assert_eq!(state.termination(), Some(Termination::FiftyMoveRule));
        assert!(state.termination().unwrap().is_draw());
    }

    #[test]
    fn test_threefold_repetition() {
        let mut state = State::initial();
        for _ in 0..2 {
            for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                state.make_move(ChessMove::from_str(uci).unwrap()).unwrap();
            }
        }
        assert_eq!(state.termination(), Some(Termination::ThreefoldRepetition));
    }
}
