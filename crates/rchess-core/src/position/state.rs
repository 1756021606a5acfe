//! 局面状態（StateInfo)
//!
//! Zobristハッシュ、王手情報、キャスリング権など、
//! do_moveのたびに更新される情報をまとめて保持する。

use crate::bitboard::Bitboard;
use crate::types::{CastlingRights, Color, Piece, PieceType, Square};

/// 局面状態
///
/// `Position` は各指し手で新しい状態値を計算して保持する。
/// 分岐が必要な場合は `Position` ごと `clone()` する設計のため、
/// 前の状態へのリンクは持たない。
#[derive(Clone)]
pub struct StateInfo {
    // === do_move時に引き継いで更新される部分 ===
    /// キャスリング権
    pub castling_rights: CastlingRights,
    /// 50手ルールカウンタ（ply単位、100で引き分け）
    pub rule50: i32,
    /// null moveからの手数
    pub plies_from_null: i32,
    /// アンパッサン対象マス（そのマスへ取る側のポーンが移動する）
    pub ep_square: Option<Square>,

    // === do_move時に再計算される部分 ===
    /// 局面ハッシュ（手番込み）
    pub key: u64,
    /// 手番側の玉に王手している駒
    pub checkers: Bitboard,
    /// pin駒候補 [Color]（その手番の玉への遮蔽駒、両陣営の駒を含む）
    pub blockers_for_king: [Bitboard; Color::NUM],
    /// pinしている駒 [Color]（その手番の玉をpinしている相手の遠方駒）
    pub pinners: [Bitboard; Color::NUM],
    /// そのマスに駒種ptを置くと相手玉に王手となる升 [PieceType]
    pub check_squares: [Bitboard; PieceType::NUM + 1],
    /// 直前の指し手で捕獲した駒
    pub captured_piece: Piece,
}

impl StateInfo {
    /// 空の状態を作成
    pub fn new() -> Self {
        StateInfo {
            castling_rights: CastlingRights::NONE,
            rule50: 0,
            plies_from_null: 0,
            ep_square: None,
            key: 0,
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; Color::NUM],
            pinners: [Bitboard::EMPTY; Color::NUM],
            check_squares: [Bitboard::EMPTY; PieceType::NUM + 1],
            captured_piece: Piece::NONE,
        }
    }
}

impl Default for StateInfo {
    fn default() -> Self {
        StateInfo::new()
    }
}
