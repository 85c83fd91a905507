//! Ray tracing for rooks, bishops, and queens.
//!
//! Attack sets stop at (and include) the first occupied square on each ray.
//! `squares_between` gives the strictly-between mask used for path clearance.

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn rook_attacks(square: u8, occupancy: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn bishop_attacks(square: u8, occupancy: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_attacks(square: u8, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

/// Squares strictly between `a` and `b` when they share a rank, file, or
/// diagonal; `0` otherwise.
pub fn squares_between(a: u8, b: u8) -> u64 {
    let (af, ar) = ((a % 8) as i32, (a / 8) as i32);
    let (bf, br) = ((b % 8) as i32, (b / 8) as i32);
    let df = bf - af;
    let dr = br - ar;

    let aligned = (df == 0) != (dr == 0) || (df != 0 && df.abs() == dr.abs());
    if !aligned {
        return 0;
    }

    let (step_f, step_r) = (df.signum(), dr.signum());
    let mut f = af + step_f;
    let mut r = ar + step_r;
    let mut mask = 0u64;
    while f != bf || r != br {
        mask |= 1u64 << (r * 8 + f);
        f += step_f;
        r += step_r;
    }
    mask
}

fn trace_ray(square: u8, file_step: i32, rank_step: i32, occupancy: u64) -> u64 {
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        attacks |= bit;

        if (occupancy & bit) != 0 {
            break;
        }

        file += file_step;
        rank += rank_step;
    }

    attacks
}
