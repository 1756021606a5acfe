//! 局面の整合性検証
//!
//! デバッグビルドのアサーションより重い、全レイヤーの突き合わせ検証。
//! テストや外部入力（FEN）の受け入れ確認に使う。

use thiserror::Error;

use crate::bitboard::{pawn_attacks, Bitboard};
use crate::types::{Color, Piece, PieceType, Rank, Square};

use super::pos::{pawn_push, Position};

/// 整合性検証の失敗理由（検証レイヤーごとに1種）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("king error: {0}")]
    King(String),
    #[error("bitboard error: {0}")]
    Bitboards(String),
    #[error("state error: {0}")]
    State(String),
    #[error("piece list error: {0}")]
    PieceLists(String),
    #[error("castling error: {0}")]
    Castling(String),
    #[error("en passant error: {0}")]
    EnPassant(String),
}

impl Position {
    /// 局面の全レイヤーを検証する
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        self.validate_kings()?;
        self.validate_bitboards()?;
        self.validate_state()?;
        self.validate_piece_lists()?;
        self.validate_castling()?;
        self.validate_en_passant()?;
        Ok(())
    }

    fn validate_kings(&self) -> Result<(), ConsistencyError> {
        for c in [Color::White, Color::Black] {
            let king = Piece::new(c, PieceType::King);
            if self.count(king) != 1 {
                return Err(ConsistencyError::King(format!(
                    "{c:?} has {} kings",
                    self.count(king)
                )));
            }
            let ksq = self.king_square(c);
            if self.piece_on(ksq) != king {
                return Err(ConsistencyError::King(format!(
                    "king_square cache for {c:?} points at {ksq:?} which holds {:?}",
                    self.piece_on(ksq)
                )));
            }
        }

        // 手番でない側の玉が取られる状態は不正
        let them = !self.side_to_move();
        if self
            .attackers_to_c(self.king_square(them), self.side_to_move())
            .is_not_empty()
        {
            return Err(ConsistencyError::King(format!(
                "{them:?} king is capturable"
            )));
        }

        Ok(())
    }

    fn validate_bitboards(&self) -> Result<(), ConsistencyError> {
        if (self.pieces_c(Color::White) & self.pieces_c(Color::Black)).is_not_empty() {
            return Err(ConsistencyError::Bitboards(
                "color bitboards overlap".to_string(),
            ));
        }

        let mut type_union = Bitboard::EMPTY;
        for pt in PieceType::ALL {
            for other in PieceType::ALL {
                if pt != other
                    && (self.pieces_pt(pt) & self.pieces_pt(other)).is_not_empty()
                {
                    return Err(ConsistencyError::Bitboards(format!(
                        "{pt:?} and {other:?} bitboards overlap"
                    )));
                }
            }
            type_union |= self.pieces_pt(pt);
        }

        if type_union != self.occupied() {
            return Err(ConsistencyError::Bitboards(
                "type union does not match occupancy".to_string(),
            ));
        }

        // 盤面配列との突き合わせ
        for sq in Square::all() {
            let pc = self.piece_on(sq);
            let on_board = self.occupied().contains(sq);
            if pc.is_some() != on_board {
                return Err(ConsistencyError::Bitboards(format!(
                    "board array and bitboards disagree at {sq:?}"
                )));
            }
            if pc.is_some()
                && (!self.pieces(pc.color(), pc.piece_type()).contains(sq))
            {
                return Err(ConsistencyError::Bitboards(format!(
                    "{pc:?} at {sq:?} missing from its bitboards"
                )));
            }
        }

        Ok(())
    }

    fn validate_state(&self) -> Result<(), ConsistencyError> {
        let us = self.side_to_move();
        let expected_checkers = self.attackers_to_c(self.king_square(us), !us);
        if self.checkers() != expected_checkers {
            return Err(ConsistencyError::State(
                "stored checkers do not match recomputation".to_string(),
            ));
        }

        for c in [Color::White, Color::Black] {
            let (blockers, pinners) = self.slider_blockers(self.pieces_c(!c), self.king_square(c));
            if self.blockers_for_king(c) != blockers || self.pinners(c) != pinners {
                return Err(ConsistencyError::State(format!(
                    "stored pin info for {c:?} does not match recomputation"
                )));
            }
        }

        if self.key() != self.compute_key() {
            return Err(ConsistencyError::State(
                "incremental key does not match recomputation".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_piece_lists(&self) -> Result<(), ConsistencyError> {
        for pc in Piece::ALL {
            let bb = self.pieces(pc.color(), pc.piece_type());
            if self.count(pc) != bb.count() as usize {
                return Err(ConsistencyError::PieceLists(format!(
                    "piece count for {pc:?} does not match bitboard"
                )));
            }
            for (i, &sq) in self.squares_of(pc).iter().enumerate() {
                if self.piece_on(sq) != pc {
                    return Err(ConsistencyError::PieceLists(format!(
                        "piece list entry {i} for {pc:?} points at {sq:?}"
                    )));
                }
                if self.index[sq.index()] as usize != i {
                    return Err(ConsistencyError::PieceLists(format!(
                        "inverse index at {sq:?} does not match list slot {i}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_castling(&self) -> Result<(), ConsistencyError> {
        for cr in self.castling_rights().iter() {
            let c = cr.color();
            let Some(rfrom) = self.castling_rook_square(cr) else {
                return Err(ConsistencyError::Castling(format!(
                    "{cr:?} held but no rook square recorded"
                )));
            };
            if self.piece_on(rfrom) != Piece::new(c, PieceType::Rook) {
                return Err(ConsistencyError::Castling(format!(
                    "{cr:?} held but no rook on {rfrom:?}"
                )));
            }
            if !self.castling_rights_mask[rfrom.index()].has(cr)
                || !self.castling_rights_mask[self.king_square(c).index()].has(cr)
            {
                return Err(ConsistencyError::Castling(format!(
                    "rights mask inconsistent for {cr:?}"
                )));
            }
        }
        Ok(())
    }

    fn validate_en_passant(&self) -> Result<(), ConsistencyError> {
        let Some(ep) = self.ep_square() else {
            return Ok(());
        };

        let us = self.side_to_move();
        let them = !us;

        if ep.rank() != Rank::Rank6.relative(us) {
            return Err(ConsistencyError::EnPassant(format!(
                "{ep:?} is on the wrong rank for {us:?} to move"
            )));
        }

        let capturers = pawn_attacks(them, ep) & self.pieces(us, PieceType::Pawn);
        let pushed_pawn = ep
            .offset(pawn_push(them))
            .map(|s| self.piece_on(s) == Piece::new(them, PieceType::Pawn))
            .unwrap_or(false);
        if capturers.is_empty() || !pushed_pawn {
            return Err(ConsistencyError::EnPassant(format!(
                "{ep:?} is not a plausible en-passant square"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;
    use crate::types::Move;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_startpos_validates() {
        assert_eq!(Position::startpos().validate(), Ok(()));
    }

    #[test]
    fn test_validates_after_scripted_game() {
        // イタリアンゲームの序盤＋キャスリング
        let mut pos = Position::from_fen(START_FEN);
        let moves = [
            Move::new_move(sq("e2"), sq("e4")),
            Move::new_move(sq("e7"), sq("e5")),
            Move::new_move(sq("g1"), sq("f3")),
            Move::new_move(sq("b8"), sq("c6")),
            Move::new_move(sq("f1"), sq("c4")),
            Move::new_move(sq("g8"), sq("f6")),
            Move::new_castling(Square::E1, Square::H1),
            Move::new_move(sq("f6"), sq("e4")),
        ];
        for m in moves {
            assert!(pos.legal(m), "move should be legal: {m:?}");
            pos.do_move(m, pos.gives_check(m));
            assert_eq!(pos.validate(), Ok(()), "after {m:?}");
        }
    }

    #[test]
    fn test_detects_corrupted_king_cache() {
        let mut pos = Position::startpos();
        pos.king_square[Color::White.index()] = sq("d4");
        assert!(matches!(pos.validate(), Err(ConsistencyError::King(_))));
    }

    #[test]
    fn test_detects_corrupted_key() {
        let mut pos = Position::startpos();
        pos.state.key ^= 1;
        assert!(matches!(pos.validate(), Err(ConsistencyError::State(_))));
    }

    #[test]
    fn test_detects_corrupted_piece_list() {
        let mut pos = Position::startpos();
        pos.index[Square::A1.index()] = 5;
        assert!(matches!(
            pos.validate(),
            Err(ConsistencyError::PieceLists(_))
        ));
    }
}
