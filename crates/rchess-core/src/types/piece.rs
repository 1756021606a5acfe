//! 駒（Piece）
//!
//! 内部表現は4bitラッパー。
//! - bit 0-2: `PieceType`（1..=6）。0 は `Piece::NONE` のみで使用される。
//! - bit 3: `Color`（0 = White, 1 = Black）。
//!
//! `Piece::NONE` 以外の値は常に有効な `PieceType` / `Color` の組み合わせで
//! あることを前提とする。`piece_type()` を呼び出す前に `is_none()` を
//! 避けるのが契約。

use super::{Color, PieceType};

/// 駒（先後の区別あり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// 駒なし
    pub const NONE: Piece = Piece(0);

    // 白の駒
    pub const W_PAWN: Piece = Piece(1);
    pub const W_KNIGHT: Piece = Piece(2);
    pub const W_BISHOP: Piece = Piece(3);
    pub const W_ROOK: Piece = Piece(4);
    pub const W_QUEEN: Piece = Piece(5);
    pub const W_KING: Piece = Piece(6);

    // 黒の駒（+8）
    pub const B_PAWN: Piece = Piece(9);
    pub const B_KNIGHT: Piece = Piece(10);
    pub const B_BISHOP: Piece = Piece(11);
    pub const B_ROOK: Piece = Piece(12);
    pub const B_QUEEN: Piece = Piece(13);
    pub const B_KING: Piece = Piece(14);

    /// 駒の種類数（NONE・未使用スロットを含む、配列サイズ用）
    pub const NUM: usize = 16;

    /// 実在する全ての駒
    pub const ALL: [Piece; 12] = [
        Piece::W_PAWN,
        Piece::W_KNIGHT,
        Piece::W_BISHOP,
        Piece::W_ROOK,
        Piece::W_QUEEN,
        Piece::W_KING,
        Piece::B_PAWN,
        Piece::B_KNIGHT,
        Piece::B_BISHOP,
        Piece::B_ROOK,
        Piece::B_QUEEN,
        Piece::B_KING,
    ];

    /// ColorとPieceTypeから生成
    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece(piece_type as u8 | ((color as u8) << 3))
    }

    /// 駒種を取得
    #[inline]
    pub const fn piece_type(self) -> PieceType {
        // SAFETY: self.0 & 7 は 0..=6 なので有効なPieceType値
        // ただし0の場合はNONEなので呼び出し側で判定が必要
        unsafe { std::mem::transmute(self.0 & 0x07) }
    }

    /// 手番を取得
    #[inline]
    pub const fn color(self) -> Color {
        // SAFETY: (self.0 >> 3) & 1 は 0 or 1 なので有効なColor値
        unsafe { std::mem::transmute((self.0 >> 3) & 1) }
    }

    /// 駒がないか
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 駒があるか
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// インデックス（0-14、0は無効）
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 内部値を取得
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// FEN形式の文字（白=大文字、黒=小文字）に変換
    pub fn to_fen_char(self) -> char {
        let c = self.piece_type().to_fen_char();
        if self.color() == Color::Black {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    /// FEN形式の文字から駒に変換
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let pt = PieceType::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, pt))
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_new() {
        assert_eq!(Piece::new(Color::White, PieceType::Pawn), Piece::W_PAWN);
        assert_eq!(Piece::new(Color::Black, PieceType::Pawn), Piece::B_PAWN);
        assert_eq!(Piece::new(Color::White, PieceType::King), Piece::W_KING);
        assert_eq!(Piece::new(Color::Black, PieceType::Queen), Piece::B_QUEEN);
    }

    #[test]
    fn test_piece_type_color() {
        assert_eq!(Piece::W_PAWN.piece_type(), PieceType::Pawn);
        assert_eq!(Piece::B_PAWN.piece_type(), PieceType::Pawn);
        assert_eq!(Piece::W_PAWN.color(), Color::White);
        assert_eq!(Piece::B_KING.color(), Color::Black);
    }

    #[test]
    fn test_piece_is_none() {
        assert!(Piece::NONE.is_none());
        assert!(!Piece::W_PAWN.is_none());
        assert!(Piece::W_PAWN.is_some());
    }

    #[test]
    fn test_piece_fen_char() {
        assert_eq!(Piece::W_PAWN.to_fen_char(), 'P');
        assert_eq!(Piece::B_PAWN.to_fen_char(), 'p');
        assert_eq!(Piece::W_QUEEN.to_fen_char(), 'Q');
        assert_eq!(Piece::B_KNIGHT.to_fen_char(), 'n');
        assert_eq!(Piece::from_fen_char('K'), Some(Piece::W_KING));
        assert_eq!(Piece::from_fen_char('r'), Some(Piece::B_ROOK));
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_piece_index() {
        assert_eq!(Piece::NONE.index(), 0);
        assert_eq!(Piece::W_PAWN.index(), 1);
        assert_eq!(Piece::B_PAWN.index(), 9);
        assert_eq!(Piece::B_KING.index(), 14);
    }
}
