//! Move direction related enums, measured as `(file delta, rank delta)` in absolute board orientation.

#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QueenLikeMoveDirection {
    UpLeft=0, DownRight=4,
    Up=1, Down=5,
    UpRight=2, DownLeft=6,
    Right=3, Left=7,
}

const ALL_QUEEN_LIKE_MOVE_DIRECTIONS: [QueenLikeMoveDirection; 8] = [
    QueenLikeMoveDirection::UpLeft,
    QueenLikeMoveDirection::Up,
    QueenLikeMoveDirection::UpRight,
    QueenLikeMoveDirection::Right,
    QueenLikeMoveDirection::DownRight,
    QueenLikeMoveDirection::Down,
    QueenLikeMoveDirection::DownLeft,
    QueenLikeMoveDirection::Left,
];

impl QueenLikeMoveDirection {
    pub fn from_index(index: usize) -> Option<QueenLikeMoveDirection> {
        ALL_QUEEN_LIKE_MOVE_DIRECTIONS.get(index).copied()
    }

    pub const fn flip(&self) -> QueenLikeMoveDirection {
        ALL_QUEEN_LIKE_MOVE_DIRECTIONS[(*self as usize + 4) % 8]
    }

    pub fn iter() -> impl Iterator<Item=QueenLikeMoveDirection> {
        ALL_QUEEN_LIKE_MOVE_DIRECTIONS.iter().copied()
    }

    /// Unit step of the direction as `(file delta, rank delta)`.
    pub const fn offset(&self) -> (i8, i8) {
        match self {
            QueenLikeMoveDirection::UpLeft => (-1, 1),
            QueenLikeMoveDirection::Up => (0, 1),
            QueenLikeMoveDirection::UpRight => (1, 1),
            QueenLikeMoveDirection::Right => (1, 0),
            QueenLikeMoveDirection::DownRight => (1, -1),
            QueenLikeMoveDirection::Down => (0, -1),
            QueenLikeMoveDirection::DownLeft => (-1, -1),
            QueenLikeMoveDirection::Left => (-1, 0),
        }
    }

    /// Direction and distance of a displacement, if it lies on a rank, file or diagonal.
    pub fn calc_and_measure_distance(file_delta: i8, rank_delta: i8) -> Option<(QueenLikeMoveDirection, u8)> {
        if file_delta == 0 && rank_delta == 0 {
            return None;
        }
        if file_delta != 0 && rank_delta != 0 && file_delta.abs() != rank_delta.abs() {
            return None;
        }

        let distance = file_delta.abs().max(rank_delta.abs());
        let step = (file_delta.signum(), rank_delta.signum());
        QueenLikeMoveDirection::iter()
            .find(|direction| direction.offset() == step)
            .map(|direction| (direction, distance as u8))
    }
}

#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum KnightMoveDirection {
    TwoUpOneLeft=0, TwoDownOneRight=4,
    TwoUpOneRight=1, TwoDownOneLeft=5,
    TwoRightOneUp=2, TwoLeftOneDown=6,
    TwoRightOneDown=3, TwoLeftOneUp=7,
}

const ALL_KNIGHT_MOVE_DIRECTIONS: [KnightMoveDirection; 8] = [
    KnightMoveDirection::TwoUpOneLeft,
    KnightMoveDirection::TwoUpOneRight,
    KnightMoveDirection::TwoRightOneUp,
    KnightMoveDirection::TwoRightOneDown,
    KnightMoveDirection::TwoDownOneRight,
    KnightMoveDirection::TwoDownOneLeft,
    KnightMoveDirection::TwoLeftOneDown,
    KnightMoveDirection::TwoLeftOneUp,
];

impl KnightMoveDirection {
    pub fn from_index(index: usize) -> Option<KnightMoveDirection> {
        ALL_KNIGHT_MOVE_DIRECTIONS.get(index).copied()
    }

    pub const fn flip(&self) -> KnightMoveDirection {
        ALL_KNIGHT_MOVE_DIRECTIONS[(*self as usize + 4) % 8]
    }

    pub fn iter() -> impl Iterator<Item=KnightMoveDirection> {
        ALL_KNIGHT_MOVE_DIRECTIONS.iter().copied()
    }

    pub const fn offset(&self) -> (i8, i8) {
        match self {
            KnightMoveDirection::TwoUpOneLeft => (-1, 2),
            KnightMoveDirection::TwoUpOneRight => (1, 2),
            KnightMoveDirection::TwoRightOneUp => (2, 1),
            KnightMoveDirection::TwoRightOneDown => (2, -1),
            KnightMoveDirection::TwoDownOneRight => (1, -2),
            KnightMoveDirection::TwoDownOneLeft => (-1, -2),
            KnightMoveDirection::TwoLeftOneDown => (-2, -1),
            KnightMoveDirection::TwoLeftOneUp => (-2, 1),
        }
    }

    pub fn calc(file_delta: i8, rank_delta: i8) -> Option<KnightMoveDirection> {
        KnightMoveDirection::iter().find(|direction| direction.offset() == (file_delta, rank_delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queen_like_move_direction() {
        for direction in QueenLikeMoveDirection::iter() {
            let (df, dr) = direction.offset();
            for distance in 1..=7i8 {
                assert_eq!(
                    QueenLikeMoveDirection::calc_and_measure_distance(df * distance, dr * distance),
                    Some((direction, distance as u8))
                );
            }
            assert_eq!(direction.flip().offset(), (-df, -dr));
            assert_eq!(QueenLikeMoveDirection::from_index(direction as usize), Some(direction));
        }
        assert_eq!(QueenLikeMoveDirection::calc_and_measure_distance(0, 0), None);
        assert_eq!(QueenLikeMoveDirection::calc_and_measure_distance(1, 2), None);
    }

    #[test]
    fn test_knight_move_direction() {
        for direction in KnightMoveDirection::iter() {
            let (df, dr) = direction.offset();
            assert_eq!(KnightMoveDirection::calc(df, dr), Some(direction));
            assert_eq!(direction.flip().offset(), (-df, -dr));
            assert_eq!(KnightMoveDirection::from_index(direction as usize), Some(direction));
        }
        assert_eq!(KnightMoveDirection::calc(2, 2), None);
    }
}
