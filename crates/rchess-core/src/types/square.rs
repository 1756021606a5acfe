//! 升目（Square）

use super::{Color, File, Rank};

/// 升目（0-63）
///
/// 配置: A1=0, B1=1, ..., H1=7, A2=8, ..., H8=63
/// `file = sq & 7`, `rank = sq >> 3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 64;

    // 定数定義（キャスリング・FENで使用する主要なもの）
    pub const A1: Square = Square(0);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const E8: Square = Square(60);
    pub const H8: Square = Square(63);

    /// FileとRankからSquareを生成
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square((rank as u8) << 3 | file as u8)
    }

    /// 筋を取得
    #[inline]
    pub const fn file(self) -> File {
        // SAFETY: self.0 & 7 は 0..=7 なので有効なFile値
        unsafe { std::mem::transmute(self.0 & 7) }
    }

    /// 段を取得
    #[inline]
    pub const fn rank(self) -> Rank {
        // SAFETY: self.0 >> 3 は 0..=7 なので有効なRank値
        unsafe { std::mem::transmute(self.0 >> 3) }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 内部値を取得
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// u8から生成（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Square> {
        if n < 64 {
            Some(Square(n))
        } else {
            None
        }
    }

    /// u8から生成（範囲チェックなし）
    ///
    /// # Safety
    /// n < 64 でなければならない
    #[inline]
    pub const unsafe fn from_u8_unchecked(n: u8) -> Square {
        debug_assert!(n < 64);
        Square(n)
    }

    /// 手番から見た相対升
    ///
    /// 白ならそのまま、黒なら上下反転（筋は不変）。
    #[inline]
    pub const fn relative(self, c: Color) -> Square {
        match c {
            Color::White => self,
            Color::Black => Square(self.0 ^ 56),
        }
    }

    /// オフセットを加えた升（盤外ならNone）
    ///
    /// 筋方向の折り返しは検出しないため、縦方向の移動にのみ使用する。
    #[inline]
    pub const fn offset(self, delta: i8) -> Option<Square> {
        let n = self.0 as i16 + delta as i16;
        if 0 <= n && n < 64 {
            Some(Square(n as u8))
        } else {
            None
        }
    }

    /// FEN/代数記法の文字列（"e4"等）に変換
    pub fn to_algebraic(self) -> String {
        let file = self.file().to_fen_char();
        let rank = self.rank().to_fen_char();
        format!("{file}{rank}")
    }

    /// 代数記法の文字列からSquareに変換
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_fen_char(chars.next()?)?;
        let rank = Rank::from_fen_char(chars.next()?)?;
        Some(Square::new(file, rank))
    }

    /// 全ての升を返すイテレータ
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_new() {
        assert_eq!(Square::new(File::FileA, Rank::Rank1), Square::A1);
        assert_eq!(Square::new(File::FileE, Rank::Rank1), Square::E1);
        assert_eq!(Square::new(File::FileH, Rank::Rank8), Square::H8);
    }

    #[test]
    fn test_square_file_rank() {
        let sq = Square::new(File::FileC, Rank::Rank7);
        assert_eq!(sq.file(), File::FileC);
        assert_eq!(sq.rank(), Rank::Rank7);
    }

    #[test]
    fn test_square_from_u8() {
        assert_eq!(Square::from_u8(0), Some(Square::A1));
        assert_eq!(Square::from_u8(63), Some(Square::H8));
        assert_eq!(Square::from_u8(64), None);
    }

    #[test]
    fn test_square_relative() {
        assert_eq!(Square::E1.relative(Color::White), Square::E1);
        assert_eq!(Square::E1.relative(Color::Black), Square::E8);
        assert_eq!(Square::A1.relative(Color::Black), Square::A8);
    }

    #[test]
    fn test_square_offset() {
        assert_eq!(Square::E1.offset(8), Square::from_algebraic("e2"));
        assert_eq!(Square::E8.offset(8), None);
        assert_eq!(Square::A1.offset(-8), None);
    }

    #[test]
    fn test_square_algebraic() {
        assert_eq!(Square::new(File::FileE, Rank::Rank4).to_algebraic(), "e4");
        assert_eq!(Square::from_algebraic("e4"), Some(Square::new(File::FileE, Rank::Rank4)));
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("i1"), None);
    }

    #[test]
    fn test_square_all() {
        let all: Vec<_> = Square::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], Square::A1);
        assert_eq!(all[63], Square::H8);
    }
}
