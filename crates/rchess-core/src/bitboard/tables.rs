//! 利きテーブル（近接駒）

use crate::types::{Color, PieceType, Square};

use super::Bitboard;

/// ポーンの利き [Color][Square]
///
/// 斜め前方への捕獲の利きのみ。直進（1歩/2歩進み）は含まない。
pub static PAWN_ATTACKS: [[Bitboard; Square::NUM]; Color::NUM] = init_pawn_attacks();

/// ナイトの利き [Square]
pub static KNIGHT_EFFECT: [Bitboard; Square::NUM] = init_knight_effect();

/// キングの利き [Square]
pub static KING_EFFECT: [Bitboard; Square::NUM] = init_king_effect();

// === 初期化関数 ===

const fn init_pawn_attacks() -> [[Bitboard; Square::NUM]; Color::NUM] {
    let mut result = [[Bitboard::EMPTY; Square::NUM]; Color::NUM];
    let mut sq = 0;
    while sq < 64 {
        let file = sq % 8;
        let rank = sq / 8;

        // 白: 左前（+7）と右前（+9）
        if rank < 7 {
            if file > 0 {
                result[0][sq] = bb_or_const(result[0][sq], square_bb_const(sq + 7));
            }
            if file < 7 {
                result[0][sq] = bb_or_const(result[0][sq], square_bb_const(sq + 9));
            }
        }

        // 黒: 左後（-9）と右後（-7）
        if rank > 0 {
            if file > 0 {
                result[1][sq] = bb_or_const(result[1][sq], square_bb_const(sq - 9));
            }
            if file < 7 {
                result[1][sq] = bb_or_const(result[1][sq], square_bb_const(sq - 7));
            }
        }

        sq += 1;
    }
    result
}

const fn init_knight_effect() -> [Bitboard; Square::NUM] {
    // (file差, rank差)
    const STEPS: [(i32, i32); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];

    let mut result = [Bitboard::EMPTY; Square::NUM];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut i = 0;
        while i < STEPS.len() {
            let (df, dr) = STEPS[i];
            let (tf, tr) = (file + df, rank + dr);
            if tf >= 0 && tf < 8 && tr >= 0 && tr < 8 {
                let to = (tr * 8 + tf) as usize;
                result[sq] = bb_or_const(result[sq], square_bb_const(to));
            }
            i += 1;
        }
        sq += 1;
    }
    result
}

const fn init_king_effect() -> [Bitboard; Square::NUM] {
    const STEPS: [(i32, i32); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    let mut result = [Bitboard::EMPTY; Square::NUM];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut i = 0;
        while i < STEPS.len() {
            let (df, dr) = STEPS[i];
            let (tf, tr) = (file + df, rank + dr);
            if tf >= 0 && tf < 8 && tr >= 0 && tr < 8 {
                let to = (tr * 8 + tf) as usize;
                result[sq] = bb_or_const(result[sq], square_bb_const(to));
            }
            i += 1;
        }
        sq += 1;
    }
    result
}

// === ヘルパー関数（const fn用）===

const fn square_bb_const(sq: usize) -> Bitboard {
    Bitboard::new(1u64 << sq)
}

const fn bb_or_const(a: Bitboard, b: Bitboard) -> Bitboard {
    Bitboard::new(a.raw() | b.raw())
}

// === アクセサ ===

/// ポーンの利きを取得（捕獲方向のみ）
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// ナイトの利きを取得
#[inline]
pub fn knight_effect(sq: Square) -> Bitboard {
    KNIGHT_EFFECT[sq.index()]
}

/// キングの利きを取得
#[inline]
pub fn king_effect(sq: Square) -> Bitboard {
    KING_EFFECT[sq.index()]
}

/// 駒種に応じた利きを取得（近接駒のみ）
///
/// 遠方駒（ビショップ / ルーク / クイーン）は occupied が必要なため
/// `sliders` モジュールの関数を使うこと。
#[inline]
pub fn piece_effect(pt: PieceType, color: Color, sq: Square) -> Bitboard {
    match pt {
        PieceType::Pawn => pawn_attacks(color, sq),
        PieceType::Knight => knight_effect(sq),
        PieceType::King => king_effect(sq),
        _ => Bitboard::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_pawn_attacks() {
        // 中央の白ポーン
        let bb = pawn_attacks(Color::White, sq("e4"));
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("d5")));
        assert!(bb.contains(sq("f5")));

        // 端の白ポーン
        let bb = pawn_attacks(Color::White, sq("a2"));
        assert_eq!(bb.count(), 1);
        assert!(bb.contains(sq("b3")));

        // 黒ポーンは後方へ
        let bb = pawn_attacks(Color::Black, sq("e5"));
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("d4")));
        assert!(bb.contains(sq("f4")));
    }

    #[test]
    fn test_knight_effect() {
        // 中央は8方向
        assert_eq!(knight_effect(sq("d4")).count(), 8);
        assert!(knight_effect(sq("d4")).contains(sq("e6")));
        assert!(knight_effect(sq("d4")).contains(sq("c2")));

        // 隅は2方向
        let bb = knight_effect(Square::A1);
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("b3")));
        assert!(bb.contains(sq("c2")));
    }

    #[test]
    fn test_king_effect() {
        // 中央は8方向
        assert_eq!(king_effect(sq("d4")).count(), 8);

        // 隅は3方向
        let bb = king_effect(Square::H8);
        assert_eq!(bb.count(), 3);
        assert!(bb.contains(sq("g7")));
        assert!(bb.contains(sq("g8")));
        assert!(bb.contains(sq("h7")));
    }
}
