//! Property test: FEN serialization is a fixpoint of parsing
//!
//! Parsing is permissive and may normalize its input (drop implausible
//! en-passant squares, ignore unknown characters), but serializing a
//! parsed position and parsing it again must reproduce the same
//! position bit for bit.

use proptest::prelude::*;

use rchess_core::position::Position;
use rchess_core::types::{Color, File, Piece, Rank, Square};

/// Piece characters that may appear on a random board (kings are
/// placed separately so that each side has exactly one)
const PLACEABLE: [char; 10] = ['P', 'N', 'B', 'R', 'Q', 'p', 'n', 'b', 'r', 'q'];

fn board_fen(board: &[Option<char>; 64]) -> String {
    let mut s = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match board[rank * 8 + file] {
                None => empty += 1,
                Some(c) => {
                    if empty > 0 {
                        s.push_str(&empty.to_string());
                        empty = 0;
                    }
                    s.push(c);
                }
            }
        }
        if empty > 0 {
            s.push_str(&empty.to_string());
        }
        if rank > 0 {
            s.push('/');
        }
    }
    s
}

prop_compose! {
    /// A random position FEN: sparse random pieces, exactly one king
    /// per side, no pawns on the back ranks
    fn arb_fen()(
        pieces in proptest::collection::vec((0usize..64, 0usize..PLACEABLE.len()), 0..24),
        wk in 0usize..64,
        bk in 0usize..64,
        black_to_move in any::<bool>(),
        rule50 in 0i32..120,
        fullmove in 1i32..200,
    ) -> String {
        let mut board: [Option<char>; 64] = [None; 64];
        for (sq, pc) in pieces {
            let c = PLACEABLE[pc];
            // ポーンは1段目と8段目に置けない
            let rank = sq / 8;
            if (c == 'P' || c == 'p') && (rank == 0 || rank == 7) {
                continue;
            }
            board[sq] = Some(c);
        }
        board[wk] = Some('K');
        if bk != wk {
            board[bk] = Some('k');
        } else {
            board[(bk + 1) % 64] = Some('k');
        }

        format!(
            "{} {} - - {} {}",
            board_fen(&board),
            if black_to_move { 'b' } else { 'w' },
            rule50,
            fullmove,
        )
    }
}

proptest! {
    #[test]
    fn fen_serialization_is_a_fixpoint(fen in arb_fen()) {
        let pos = Position::from_fen(&fen);
        let serialized = pos.to_fen();

        let reparsed = Position::from_fen(&serialized);
        prop_assert_eq!(&reparsed.to_fen(), &serialized);
        prop_assert_eq!(reparsed.key(), pos.key());
        prop_assert_eq!(reparsed.side_to_move(), pos.side_to_move());
        prop_assert_eq!(reparsed.rule50_count(), pos.rule50_count());
        prop_assert_eq!(reparsed.game_ply(), pos.game_ply());
    }
}

#[test]
fn board_scan_matches_piece_lists() {
    // A deterministic complement to the property above: every square's
    // piece appears in its piece list and vice versa
    let pos = Position::startpos();
    for color in [Color::White, Color::Black] {
        for sq in Square::all() {
            let pc = pos.piece_on(sq);
            if pc.is_some() && pc.color() == color {
                assert!(pos.squares_of(pc).contains(&sq));
            }
        }
    }
    // Spot-check a known list
    let w_pawns = pos.squares_of(Piece::W_PAWN);
    assert_eq!(w_pawns.len(), 8);
    for file in File::ALL {
        assert!(w_pawns.contains(&Square::new(file, Rank::Rank2)));
    }
}
