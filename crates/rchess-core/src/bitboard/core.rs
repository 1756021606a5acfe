//! Bitboard（64bit盤面表現）

use crate::types::{File, Rank, Square};

/// Bitboard（64bit、1マス1bit）
///
/// bit n が Square n に対応する（A1=0、B1=1、…、H8=63）。
/// シフト方向:
/// - `<< 8`: 1段上（白から見て前方）
/// - `>> 8`: 1段下
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct Bitboard(u64);

impl Bitboard {
    /// 空のBitboard
    pub const EMPTY: Bitboard = Bitboard(0);

    /// 全マスが立っているBitboard
    pub const ALL: Bitboard = Bitboard(!0);

    /// 生の値を指定して生成
    #[inline]
    pub const fn new(v: u64) -> Bitboard {
        Bitboard(v)
    }

    /// 単一マスのBitboard
    #[inline]
    pub const fn from_square(sq: Square) -> Bitboard {
        Bitboard(1u64 << sq.index())
    }

    /// 空かどうか
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 空でないかどうか
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// ビットが立っている数
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// 2つ以上のビットが立っているか
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// 最下位ビットのSquareを取得して消す
    #[inline]
    pub fn pop(&mut self) -> Square {
        debug_assert!(!self.is_empty(), "pop() called on empty Bitboard");
        let idx = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        // SAFETY: 空でないので trailing_zeros() < 64
        unsafe { Square::from_u8_unchecked(idx as u8) }
    }

    /// 最下位ビットのSquareを取得（消さない）
    ///
    /// 空の場合は不正な値を返すため、
    /// 空でないことが保証されている場合のみ使用すること。
    #[inline]
    pub const fn lsb_unchecked(self) -> Square {
        debug_assert!(self.0 != 0);
        // SAFETY: 呼び出し側が空でないことを保証する
        unsafe { Square::from_u8_unchecked(self.0.trailing_zeros() as u8) }
    }

    /// 最下位ビットのSquareを取得（消さない）
    ///
    /// 空の場合はNoneを返す。
    #[inline]
    pub fn lsb(self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(self.lsb_unchecked())
        }
    }

    /// 指定マスにビットが立っているか
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 >> sq.index()) & 1 != 0
    }

    /// ビットを立てる
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// ビットを消す
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.index());
    }

    /// ビットをXOR（トグル）
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1u64 << sq.index();
    }

    /// 全ビットを1段上（8bit左）へシフト
    #[inline]
    pub const fn shift_up(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// 全ビットを1段下（8bit右）へシフト
    #[inline]
    pub const fn shift_down(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    /// 生の値を取得
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// イテレータを返す
    #[inline]
    pub const fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

// ビット演算
impl std::ops::BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl std::ops::BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitXor for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl std::ops::BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl std::ops::Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl std::fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bitboard {{")?;
        // 盤面形式で表示（8段目から1段目、a筋からh筋）
        for rank in (0..8).rev() {
            write!(f, "  ")?;
            for file in 0..8 {
                let bit = (self.0 >> (rank * 8 + file)) & 1;
                write!(f, "{}", if bit == 1 { "X" } else { "." })?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

/// Bitboardイテレータ
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.pop())
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Bitboard {
        Bitboard::from_square(sq)
    }
}

/// 指定したファイルの全マス
#[inline]
pub const fn file_bb(f: File) -> Bitboard {
    Bitboard(0x0101_0101_0101_0101u64 << f.index())
}

/// 指定したランクの全マス
#[inline]
pub const fn rank_bb(r: Rank) -> Bitboard {
    Bitboard(0xFFu64 << (r.index() * 8))
}
