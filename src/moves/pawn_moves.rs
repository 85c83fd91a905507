use crate::game_state::chess_types::Color;

pub const LIGHT_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(1);
pub const DARK_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(-1);

/// Diagonal capture targets of a pawn of `color` standing on `square`.
#[inline]
pub const fn pawn_attacks(color: Color, square: u8) -> u64 {
    match color {
        Color::Light => LIGHT_PAWN_ATTACKS[square as usize],
        Color::Dark => DARK_PAWN_ATTACKS[square as usize],
    }
}

/// Rank delta of a forward pawn step for `color`.
#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::Light => 1,
        Color::Dark => -1,
    }
}

/// Rank a pawn of `color` starts on and may double-step from.
#[inline]
pub const fn pawn_start_rank(color: Color) -> u8 {
    match color {
        Color::Light => 1,
        Color::Dark => 6,
    }
}

/// Square `steps` ranks in front of `square` for `color`, if still on the board.
#[inline]
pub fn pawn_push_target(color: Color, square: u8, steps: i8) -> Option<u8> {
    let rank = (square / 8) as i8 + pawn_direction(color) * steps;
    if (0..8).contains(&rank) {
        Some(rank as u8 * 8 + square % 8)
    } else {
        None
    }
}

const fn generate_pawn_attacks(rank_step: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32 + rank_step;
        let mut attacks = 0u64;

        if rank >= 0 && rank < 8 {
            if file > 0 {
                attacks |= 1u64 << (rank as usize * 8 + (file - 1) as usize);
            }
            if file < 7 {
                attacks |= 1u64 << (rank as usize * 8 + (file + 1) as usize);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}
