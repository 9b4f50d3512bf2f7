use std::str::FromStr;
use chess::{Board, Color};
use crate::state::{State, StateError};

pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid_fen(fen: &str, reason: impl Into<String>) -> StateError {
    StateError::InvalidFen { fen: fen.to_string(), reason: reason.into() }
}

fn process_fen_halfmove_clock(fen: &str, fen_halfmove_clock: Option<&str>) -> Result<u32, StateError> {
    match fen_halfmove_clock {
        None => Ok(0),
        Some(field) => field
            .parse::<u32>()
            .map_err(|_| invalid_fen(fen, format!("invalid halfmove clock `{}`", field))),
    }
}

fn process_fen_fullmove(fen: &str, fen_fullmove: Option<&str>) -> Result<u32, StateError> {
    match fen_fullmove {
        None => Ok(1),
        Some(field) => match field.parse::<u32>() {
            Ok(fullmove) if fullmove >= 1 => Ok(fullmove),
            _ => Err(invalid_fen(fen, format!("invalid fullmove counter `{}`", field))),
        },
    }
}

impl State {
    /// Parses a FEN string. The clock fields are optional and default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<State, StateError> {
        let fen_parts: Vec<&str> = fen.split_ascii_whitespace().collect();
        if fen_parts.len() < 4 || fen_parts.len() > 6 {
            return Err(invalid_fen(fen, format!("expected 4 to 6 fields, found {}", fen_parts.len())));
        }

        let board = Board::from_str(&fen_parts[..4].join(" "))
            .map_err(|err| invalid_fen(fen, format!("{:?}", err)))?;
        let halfmove_clock = process_fen_halfmove_clock(fen, fen_parts.get(4).copied())?;
        let fullmove = process_fen_fullmove(fen, fen_parts.get(5).copied())?;

        let ply = (fullmove - 1) * 2 + match board.side_to_move() {
            Color::White => 0,
            Color::Black => 1,
        };
        Ok(State::from_parts(board, halfmove_clock, ply))
    }

    pub fn to_fen(&self) -> String {
        // the board's own FEN carries placeholder clocks
        let board_fen = self.board.to_string();
        let fields: Vec<&str> = board_fen.split_ascii_whitespace().take(4).collect();
        format!("{} {} {}", fields.join(" "), self.halfmove_clock, self.fullmove())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_fen() {
        let state = State::from_fen(INITIAL_FEN).unwrap();
        assert_eq!(state, State::initial());
        assert_eq!(state.to_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_clocks() {
        let state = State::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 7 12").unwrap();
        assert_eq!(state.halfmove_clock, 7);
        assert_eq!(state.ply, 23);
        assert_eq!(state.fullmove(), 12);
        assert_eq!(state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_missing_clocks() {
        let state = State::from_fen("8/8/4k3/8/8/3K4/8/8 w - -").unwrap();
        assert_eq!(state.halfmove_clock, 0);
        assert_eq!(state.ply, 0);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(State::from_fen("").is_err());
        assert!(State::from_fen("8/8/8/8 w - - 0 1").is_err());
        assert!(State::from_fen("8/8/4k3/8/8/3K4/8/8 w - - x 1").is_err());
        assert!(State::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 0").is_err());
    }
}
