//! Perft node counting used to pin move generation against known totals.

use std::sync::Arc;
use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::move_generation::rule_errors::{RuleError, RuleResult};
use crate::moves::move_descriptions::{
    has_flag, move_promotion_piece, FLAG_CAPTURE, FLAG_CASTLING, FLAG_EN_PASSANT,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }

    fn tally_leaf(&mut self, mv: &GeneratedMove) {
        let description = mv.move_description;
        self.nodes += 1;
        if has_flag(description, FLAG_CAPTURE) {
            self.captures += 1;
        }
        if has_flag(description, FLAG_EN_PASSANT) {
            self.en_passant += 1;
        }
        if has_flag(description, FLAG_CASTLING) {
            self.castles += 1;
        }
        if move_promotion_piece(description).is_some() {
            self.promotions += 1;
        }
        if mv.gives_check {
            self.checks += 1;
        }
    }
}

pub fn perft<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> RuleResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(game_state)? {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }
    Ok(total)
}

/// Splits the root moves across threads, one per move.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    game_state: &GameState,
    depth: u8,
) -> RuleResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(game_state)?;
    let handles: Vec<_> = root_moves
        .into_iter()
        .map(|mv| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let mut local = PerftCounts::default();
                let result = perft_recurse(generator.as_ref(), &mv, depth, 1, &mut local);
                result.map(|_| local)
            })
        })
        .collect();

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle
            .join()
            .map_err(|_| RuleError::Inconsistent("perft worker thread panicked".to_owned()))??;
        total.merge(local);
    }
    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> RuleResult<()> {
    if current_depth == search_depth {
        counts.tally_leaf(mv);
        return Ok(());
    }

    for child in generator.generate_legal_moves(&mv.game_after_move)? {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0";

    #[test]
    fn start_position_node_counts() {
        let game = GameState::new_game();
        let generator = LegalMoveGenerator;

        assert_eq!(perft(&generator, &game, 1).expect("perft").nodes, 20);
        assert_eq!(perft(&generator, &game, 2).expect("perft").nodes, 400);

        let depth3 = perft(&generator, &game, 3).expect("perft");
        assert_eq!(depth3.nodes, 8902);
        assert_eq!(depth3.captures, 34);
        assert_eq!(depth3.checks, 12);
    }

    #[test]
    fn kiwipete_exercises_castling_and_en_passant() {
        let game = GameState::from_fen(KIWIPETE).expect("fen should parse");
        let generator = LegalMoveGenerator;

        let depth1 = perft(&generator, &game, 1).expect("perft");
        assert_eq!(depth1.nodes, 48);
        assert_eq!(depth1.captures, 8);
        assert_eq!(depth1.castles, 2);

        let depth2 = perft(&generator, &game, 2).expect("perft");
        assert_eq!(depth2.nodes, 2039);
        assert_eq!(depth2.captures, 351);
        assert_eq!(depth2.en_passant, 1);
        assert_eq!(depth2.castles, 91);
        assert_eq!(depth2.checks, 3);
    }

    #[test]
    fn threaded_perft_matches_single_thread() {
        let game = GameState::new_game();
        let threaded = perft_multi_threaded(Arc::new(LegalMoveGenerator), &game, 3).expect("perft");
        let single = perft(&LegalMoveGenerator, &game, 3).expect("perft");
        assert_eq!(threaded, single);
    }
}
