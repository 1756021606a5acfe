//! キャスリング権の登録と経路判定

use crate::bitboard::{between_bb, Bitboard};
use crate::types::{CastlingRight, CastlingSide, Color, Square};

use super::pos::Position;

impl Position {
    /// キャスリング権を登録する（FEN読み込み時に呼ばれる）
    ///
    /// 翼はキングとルークのファイル順で決まる。経路は
    /// キングとルークそれぞれの移動区間の全マス（目的地を含み、
    /// kfrom/rfrom自身を除く）。
    pub(super) fn set_castling_right(&mut self, c: Color, rfrom: Square) {
        let kfrom = self.king_square(c);
        let side = if kfrom.raw() < rfrom.raw() {
            CastlingSide::KingSide
        } else {
            CastlingSide::QueenSide
        };
        let cr = CastlingRight::make(c, side);

        self.state.castling_rights.insert(cr);
        self.castling_rights_mask[kfrom.index()].insert(cr);
        self.castling_rights_mask[rfrom.index()].insert(cr);
        self.castling_rook_square[cr.index()] = Some(rfrom);

        let kto = match side {
            CastlingSide::KingSide => Square::G1,
            CastlingSide::QueenSide => Square::C1,
        }
        .relative(c);
        let rto = match side {
            CastlingSide::KingSide => Square::F1,
            CastlingSide::QueenSide => Square::D1,
        }
        .relative(c);

        let origins = Bitboard::from_square(kfrom) | Bitboard::from_square(rfrom);
        self.castling_path[cr.index()] = (between_bb(rfrom, rto)
            | between_bb(kfrom, kto)
            | Bitboard::from_square(kto)
            | Bitboard::from_square(rto))
            & !origins;
    }

    /// キャスリング経路上に駒があるか
    #[inline]
    pub fn castling_impeded(&self, cr: CastlingRight) -> bool {
        (self.castling_path[cr.index()] & self.occupied()).is_not_empty()
    }

    /// 権利に対応するルークの初期位置
    #[inline]
    pub fn castling_rook_square(&self, cr: CastlingRight) -> Option<Square> {
        self.castling_rook_square[cr.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::Move;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_castling_path() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");

        // キングサイド白: f1, g1
        let path = pos.castling_path[CastlingRight::WhiteKingSide.index()];
        assert_eq!(path.count(), 2);
        assert!(path.contains(sq("f1")));
        assert!(path.contains(sq("g1")));

        // クイーンサイド白: b1, c1, d1
        let path = pos.castling_path[CastlingRight::WhiteQueenSide.index()];
        assert_eq!(path.count(), 3);
        assert!(path.contains(sq("b1")));
        assert!(path.contains(sq("c1")));
        assert!(path.contains(sq("d1")));
    }

    #[test]
    fn test_castling_impeded() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        // b1のナイトがクイーンサイドの経路を塞ぐ
        assert!(pos.castling_impeded(CastlingRight::WhiteQueenSide));
        assert!(!pos.castling_impeded(CastlingRight::WhiteKingSide));
        assert!(!pos.castling_impeded(CastlingRight::BlackQueenSide));
    }

    #[test]
    fn test_rook_square_registration() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(
            pos.castling_rook_square(CastlingRight::WhiteKingSide),
            Some(Square::H1)
        );
        assert_eq!(
            pos.castling_rook_square(CastlingRight::BlackQueenSide),
            Some(Square::A8)
        );
    }

    #[test]
    fn test_rights_lost_after_rook_move() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        // a1ルークが動くと白クイーンサイドの権利だけ失われる
        pos.do_move(Move::new_move(sq("a1"), sq("a2")), false);
        assert!(!pos.castling_rights().has(CastlingRight::WhiteQueenSide));
        assert!(pos.castling_rights().has(CastlingRight::WhiteKingSide));
        assert!(pos.castling_rights().has(CastlingRight::BlackKingSide));
    }

    #[test]
    fn test_rights_lost_after_rook_captured() {
        // h8のルークが取られると黒キングサイドの権利が失われる
        let mut pos = Position::from_fen("r3k2r/7Q/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = Move::new_move(sq("h7"), sq("h8"));
        pos.do_move(m, pos.gives_check(m));
        assert!(!pos.castling_rights().has(CastlingRight::BlackKingSide));
        assert!(pos.castling_rights().has(CastlingRight::BlackQueenSide));
    }
}
