// Board geometry
pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

// Snapshot planes
pub const NUM_PIECE_TYPES: usize = 6; // pawn, knight, bishop, rook, queen, king
pub const NUM_PIECE_PLANES: usize = NUM_PIECE_TYPES * 2; // own pieces, then opponent pieces
pub const NUM_REPETITION_PLANES: usize = 2;
pub const NUM_SNAPSHOT_PLANES: usize = NUM_PIECE_PLANES + NUM_REPETITION_PLANES; // 14
pub const MAX_REPETITION_COUNT: usize = 3;

// Position planes
pub const NUM_SNAPSHOTS: usize = 8; // current position plus 7 plies of lookback
pub const NUM_HISTORY_PLANES: usize = NUM_SNAPSHOTS * NUM_SNAPSHOT_PLANES; // 112
pub const NUM_METADATA_PLANES: usize = 7;
pub const NUM_POSITION_PLANES: usize = NUM_HISTORY_PLANES + NUM_METADATA_PLANES; // 119

pub const SIDE_TO_MOVE_PLANE: usize = NUM_HISTORY_PLANES;
pub const PLY_PLANE: usize = NUM_HISTORY_PLANES + 1;
pub const OWN_KINGSIDE_CASTLING_PLANE: usize = NUM_HISTORY_PLANES + 2;
pub const OWN_QUEENSIDE_CASTLING_PLANE: usize = NUM_HISTORY_PLANES + 3;
pub const OPPONENT_KINGSIDE_CASTLING_PLANE: usize = NUM_HISTORY_PLANES + 4;
pub const OPPONENT_QUEENSIDE_CASTLING_PLANE: usize = NUM_HISTORY_PLANES + 5;
pub const HALFMOVE_CLOCK_PLANE: usize = NUM_HISTORY_PLANES + 6;

// Action planes
pub const NUM_RAY_DIRECTIONS: usize = 8;
pub const MAX_RAY_LENGTH: usize = 7;
pub const NUM_QUEEN_LIKE_MOVES: usize = NUM_RAY_DIRECTIONS * MAX_RAY_LENGTH; // 56

pub const NUM_KNIGHT_MOVES: usize = 8;
pub const KNIGHT_MOVES_OFFSET: usize = NUM_QUEEN_LIKE_MOVES;

pub const NUM_UNDERPROMOTION_PIECES: usize = 3; // knight, bishop, rook
pub const NUM_UNDERPROMOTION_DIRECTIONS: usize = 3; // towards the a-file, straight, towards the h-file
pub const NUM_UNDERPROMOTIONS: usize = NUM_UNDERPROMOTION_PIECES * NUM_UNDERPROMOTION_DIRECTIONS; // 9
pub const UNDERPROMOTIONS_OFFSET: usize = KNIGHT_MOVES_OFFSET + NUM_KNIGHT_MOVES; // 64

pub const NUM_MOVE_TYPES: usize = NUM_QUEEN_LIKE_MOVES + NUM_KNIGHT_MOVES + NUM_UNDERPROMOTIONS; // 73
pub const NUM_ACTIONS: usize = NUM_SQUARES * NUM_MOVE_TYPES; // 4672
