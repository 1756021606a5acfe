//! キャスリング権

use super::Color;

/// キャスリングの翼（キングサイド / クイーンサイド）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    KingSide = 0,
    QueenSide = 1,
}

/// 個別のキャスリング権（1bit）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingRight {
    WhiteKingSide = 1,
    WhiteQueenSide = 2,
    BlackKingSide = 4,
    BlackQueenSide = 8,
}

impl CastlingRight {
    /// 全ての権利（列挙順はbit順）
    pub const ALL: [CastlingRight; 4] = [
        CastlingRight::WhiteKingSide,
        CastlingRight::WhiteQueenSide,
        CastlingRight::BlackKingSide,
        CastlingRight::BlackQueenSide,
    ];

    /// 手番と翼から権利を作る
    #[inline]
    pub const fn make(color: Color, side: CastlingSide) -> CastlingRight {
        // SAFETY: 1 << (0..=3) は 1,2,4,8 のいずれか
        unsafe { std::mem::transmute(1u8 << ((color as u8) * 2 + (side as u8))) }
    }

    /// この権利の持ち主
    #[inline]
    pub const fn color(self) -> Color {
        match self {
            CastlingRight::WhiteKingSide | CastlingRight::WhiteQueenSide => Color::White,
            CastlingRight::BlackKingSide | CastlingRight::BlackQueenSide => Color::Black,
        }
    }

    /// この権利の翼
    #[inline]
    pub const fn side(self) -> CastlingSide {
        match self {
            CastlingRight::WhiteKingSide | CastlingRight::BlackKingSide => CastlingSide::KingSide,
            CastlingRight::WhiteQueenSide | CastlingRight::BlackQueenSide => CastlingSide::QueenSide,
        }
    }

    /// 0-3 のインデックス（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        (self as u8).trailing_zeros() as usize
    }

    /// FEN用の文字（KQkq）
    #[inline]
    pub const fn to_fen_char(self) -> char {
        match self {
            CastlingRight::WhiteKingSide => 'K',
            CastlingRight::WhiteQueenSide => 'Q',
            CastlingRight::BlackKingSide => 'k',
            CastlingRight::BlackQueenSide => 'q',
        }
    }
}

/// キャスリング権の集合（4bitマスク）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// 権利なし
    pub const NONE: CastlingRights = CastlingRights(0);
    /// 全権利あり
    pub const ALL: CastlingRights = CastlingRights(0b1111);
    /// 白の全権利
    pub const WHITE: CastlingRights = CastlingRights(0b0011);
    /// 黒の全権利
    pub const BLACK: CastlingRights = CastlingRights(0b1100);

    /// 権利を持っているか
    #[inline]
    pub const fn has(self, cr: CastlingRight) -> bool {
        self.0 & (cr as u8) != 0
    }

    /// 指定した手番の権利をいずれか持っているか
    #[inline]
    pub const fn has_color(self, c: Color) -> bool {
        match c {
            Color::White => self.0 & Self::WHITE.0 != 0,
            Color::Black => self.0 & Self::BLACK.0 != 0,
        }
    }

    /// 権利を追加
    #[inline]
    pub fn insert(&mut self, cr: CastlingRight) {
        self.0 |= cr as u8;
    }

    /// マスクで指定した権利を剥奪
    #[inline]
    pub fn remove_mask(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    /// 空かどうか
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 生のビットマスク
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// 保持している権利を bit順（KQkq）で列挙
    pub fn iter(self) -> impl Iterator<Item = CastlingRight> {
        CastlingRight::ALL.into_iter().filter(move |cr| self.has(*cr))
    }
}
