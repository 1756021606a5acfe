//! 段（Rank）

use super::Color;

/// 段（1段目〜8段目）
///
/// Rank1 が白の陣地側、Rank8 が黒の陣地側。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Rank1 = 0,
    Rank2 = 1,
    Rank3 = 2,
    Rank4 = 3,
    Rank5 = 4,
    Rank6 = 5,
    Rank7 = 6,
    Rank8 = 7,
}

impl Rank {
    /// 段の数
    pub const NUM: usize = 8;

    /// 全ての段
    pub const ALL: [Rank; 8] = [
        Rank::Rank1,
        Rank::Rank2,
        Rank::Rank3,
        Rank::Rank4,
        Rank::Rank5,
        Rank::Rank6,
        Rank::Rank7,
        Rank::Rank8,
    ];

    /// u8からRankに変換（0-7）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Rank> {
        if n < 8 {
            // SAFETY: n < 8 なので有効なRank値
            Some(unsafe { std::mem::transmute::<u8, Rank>(n) })
        } else {
            None
        }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 手番から見た相対段
    ///
    /// 白ならそのまま、黒なら180度回転した段を返す。
    #[inline]
    pub const fn relative(self, c: Color) -> Rank {
        match c {
            Color::White => self,
            // SAFETY: 7 - n は 0..=7 なので有効なRank値
            Color::Black => unsafe { std::mem::transmute::<u8, Rank>(7 - self as u8) },
        }
    }

    /// FEN形式の文字（'1'-'8'）に変換
    #[inline]
    pub const fn to_fen_char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// FEN形式の文字からRankに変換
    #[inline]
    pub const fn from_fen_char(c: char) -> Option<Rank> {
        let n = (c as u8).wrapping_sub(b'1');
        Rank::from_u8(n)
    }
}
