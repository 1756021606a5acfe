//! 駒種（PieceType）

/// 駒種（手番の区別なし）
///
/// 判別値はポーン=1から始まり、0は `Piece::NONE` 用に空けてある。
/// Pawn→King の昇順は SEE の「最も価値の低い攻撃駒」ループが
/// そのまま利用するため変更してはならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    /// 駒種の数（NONEを含まない。配列は NUM + 1 で確保する）
    pub const NUM: usize = 6;

    /// 全ての駒種（価値の低い順）
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// ポーンの成り先となれる駒種
    pub const PROMOTABLE: [PieceType; 4] = [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ];

    /// u8からPieceTypeに変換（1-6）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<PieceType> {
        if 1 <= n && n <= 6 {
            // SAFETY: 1 <= n <= 6 なので有効なPieceType値
            Some(unsafe { std::mem::transmute::<u8, PieceType>(n) })
        } else {
            None
        }
    }

    /// インデックスとして使用（1-6）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 遠方駒（ビショップ・ルーク・クイーン）かどうか
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
    }

    /// FEN形式の文字（大文字）に変換
    #[inline]
    pub const fn to_fen_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// FEN形式の文字（大文字小文字不問）からPieceTypeに変換
    #[inline]
    pub const fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}
