//! Authoritative board model.
//!
//! `GameState` stores piece bitboards, occupancy caches, side to move,
//! castling rights, the en-passant target, clocks, and the append-only move
//! log. It carries no rule behavior beyond keeping those caches consistent;
//! legality lives in `move_generation`.

use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    /// Applied moves in order. Only ever appended to.
    pub move_log: Vec<ChessMove>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            move_log: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut game = Self {
            castling_rights: CASTLE_ALL,
            ..Self::default()
        };
        let [light, dark] = &mut game.pieces;
        let pawn = PieceKind::Pawn.index();
        for (file, piece) in (0u8..).zip(BACK_RANK) {
            light[piece.index()] |= 1u64 << make_square(file, 0);
            light[pawn] |= 1u64 << make_square(file, 1);
            dark[pawn] |= 1u64 << make_square(file, 6);
            dark[piece.index()] |= 1u64 << make_square(file, 7);
        }
        game.recalc_occupancy();
        game
    }

    /// The same position with an empty move log. Scratch boards for
    /// legality probes are built from this.
    #[inline]
    pub fn position_copy(&self) -> Self {
        Self {
            move_log: Vec::new(),
            ..*self
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::Light, Color::Dark] {
            if self.occupancy_by_color[color.index()] & mask == 0 {
                continue;
            }
            for piece in ALL_PIECE_KINDS {
                if self.pieces[color.index()][piece.index()] & mask != 0 {
                    return Some((color, piece));
                }
            }
        }
        None
    }

    #[inline]
    pub fn piece_bitboard(&self, color: Color, piece: PieceKind) -> u64 {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    pub fn put_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.clear_square(square);
        self.pieces[color.index()][piece.index()] |= 1u64 << square;
        self.recalc_occupancy();
    }

    pub fn clear_square(&mut self, square: Square) {
        let mask = !(1u64 << square);
        for side in self.pieces.iter_mut() {
            for bb in side.iter_mut() {
                *bb &= mask;
            }
        }
        self.recalc_occupancy();
    }

    pub fn recalc_occupancy(&mut self) {
        for color in [Color::Light, Color::Dark] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::Light.index()]
            | self.occupancy_by_color[Color::Dark.index()];
    }

    /// Number of kings of `color` on the board.
    #[inline]
    pub fn king_count(&self, color: Color) -> u32 {
        self.piece_bitboard(color, PieceKind::King).count_ones()
    }

    /// The most recently applied move.
    #[inline]
    pub fn last_move(&self) -> Option<&ChessMove> {
        self.move_log.last()
    }
}
