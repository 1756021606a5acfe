//! 指し手（Move）

use super::{PieceType, Square};

/// 指し手の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// 通常の指し手
    Normal,
    /// ポーンの成り
    Promotion,
    /// アンパッサン
    EnPassant,
    /// キャスリング
    Castling,
}

/// 指し手（16bit）
///
/// - bit 0-5:   移動先 (to)
/// - bit 6-11:  移動元 (from)
/// - bit 12-13: 成り先駒種 (0=ナイト, 1=ビショップ, 2=ルーク, 3=クイーン)
/// - bit 14-15: 指し手種別 (0=通常, 1=成り, 2=アンパッサン, 3=キャスリング)
///
/// キャスリングは「キングが自分のルークを取る」形で符号化する。
/// `to` はルークの元位置であり、キングの着地点ではない。
/// これによりFENで読み込んだ非標準ルーク位置のキャスリングも表現できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);

    const TO_MASK: u16 = 0x003F; // bit 0-5
    const FROM_MASK: u16 = 0x0FC0; // bit 6-11
    const FROM_SHIFT: u16 = 6;
    const PROMO_SHIFT: u16 = 12;
    const KIND_SHIFT: u16 = 14;
    const KIND_PROMOTION: u16 = 1 << Self::KIND_SHIFT;
    const KIND_EN_PASSANT: u16 = 2 << Self::KIND_SHIFT;
    const KIND_CASTLING: u16 = 3 << Self::KIND_SHIFT;

    /// 通常の指し手を生成
    #[inline]
    pub const fn new_move(from: Square, to: Square) -> Move {
        Move((to.raw() as u16) | ((from.raw() as u16) << Self::FROM_SHIFT))
    }

    /// 成りの指し手を生成
    ///
    /// `promotion` はナイト〜クイーンのいずれか。
    #[inline]
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceType) -> Move {
        debug_assert!(
            promotion as u8 >= PieceType::Knight as u8 && promotion as u8 <= PieceType::Queen as u8
        );
        Move(
            (to.raw() as u16)
                | ((from.raw() as u16) << Self::FROM_SHIFT)
                | (((promotion as u16) - (PieceType::Knight as u16)) << Self::PROMO_SHIFT)
                | Self::KIND_PROMOTION,
        )
    }

    /// アンパッサンの指し手を生成
    #[inline]
    pub const fn new_en_passant(from: Square, to: Square) -> Move {
        Move(
            (to.raw() as u16)
                | ((from.raw() as u16) << Self::FROM_SHIFT)
                | Self::KIND_EN_PASSANT,
        )
    }

    /// キャスリングの指し手を生成（to = ルークの元位置）
    #[inline]
    pub const fn new_castling(king_from: Square, rook_from: Square) -> Move {
        Move(
            (rook_from.raw() as u16)
                | ((king_from.raw() as u16) << Self::FROM_SHIFT)
                | Self::KIND_CASTLING,
        )
    }

    /// 移動先を取得
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: to は 0-63 の範囲（6bit）
        unsafe { Square::from_u8_unchecked((self.0 & Self::TO_MASK) as u8) }
    }

    /// 移動元を取得
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: from は 0-63 の範囲（6bit）
        unsafe { Square::from_u8_unchecked(((self.0 & Self::FROM_MASK) >> Self::FROM_SHIFT) as u8) }
    }

    /// 指し手種別を取得
    #[inline]
    pub const fn kind(self) -> MoveKind {
        match self.0 >> Self::KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// 成り先の駒種を取得（成りでない場合は無効）
    #[inline]
    pub const fn promotion_type(self) -> PieceType {
        debug_assert!(matches!(self.kind(), MoveKind::Promotion));
        // SAFETY: 2 + (0..=3) は 2..=5 なので有効なPieceType値
        unsafe {
            std::mem::transmute(
                (PieceType::Knight as u8) + ((self.0 >> Self::PROMO_SHIFT) & 3) as u8,
            )
        }
    }

    /// 成りかどうか
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    /// アンパッサンかどうか
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    /// キャスリングかどうか
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    /// 無効な指し手かどうか
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 有効な指し手かどうか
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}
