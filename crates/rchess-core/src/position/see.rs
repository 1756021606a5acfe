//! SEE (Static Exchange Evaluation)
//!
//! 指し手の駒交換の損得を、実際に盤面を動かさずに占有Bitboardの
//! 差し引きだけで評価する。

use crate::bitboard::Bitboard;
use crate::types::{Color, Move, Piece, PieceType, Square};

use super::pos::{pawn_push, Position};

impl Position {
    /// 指し手で動く駒を取得
    #[inline]
    pub fn moved_piece(&self, m: Move) -> Piece {
        self.piece_on(m.from())
    }

    /// 取る手かどうか（アンパッサンを含む、キャスリングは除く）
    #[inline]
    pub fn is_capture(&self, m: Move) -> bool {
        (self.piece_on(m.to()).is_some() && !m.is_castling()) || m.is_en_passant()
    }

    /// SEE >= threshold かどうかを判定
    ///
    /// 指し手の静的駒交換評価が閾値以上かどうかを高速に判定する。
    pub fn see_ge(&self, m: Move, threshold: i32) -> bool {
        if m.is_castling() {
            // キャスリングは駒を取らない
            return threshold <= 0;
        }

        let from = m.from();
        let to = m.to();

        // 取られる駒の価値
        let captured_value = if m.is_en_passant() {
            see_piece_value(PieceType::Pawn)
        } else if self.piece_on(to).is_some() {
            see_piece_value(self.piece_on(to).piece_type())
        } else {
            0
        };

        // 最初の交換後のバランス
        let mut balance = captured_value - threshold;

        // 既にマイナスなら失敗
        if balance < 0 {
            return false;
        }

        // 動かした駒をそのまま取られても閾値を超えるか
        let next_victim = see_piece_value(self.piece_on(from).piece_type());
        balance -= next_victim;

        if balance >= 0 {
            return true;
        }

        // 移動元と移動先の両方を占有から外す（x-ray攻撃を正しく検出するため）。
        // アンパッサンでは取られるポーンのマスも外す
        let mut occupied =
            self.occupied() ^ Bitboard::from_square(from) ^ Bitboard::from_square(to);
        if m.is_en_passant() {
            if let Some(capsq) = to.offset(pawn_push(!self.side_to_move())) {
                occupied ^= Bitboard::from_square(capsq);
            }
        }

        self.see_ge_detailed(to, occupied, balance, next_victim)
    }

    /// 詳細なSEE計算（駒交換の応酬をシミュレート）
    fn see_ge_detailed(
        &self,
        to: Square,
        mut occupied: Bitboard,
        mut balance: i32,
        mut victim_value: i32,
    ) -> bool {
        let mut stm = !self.side_to_move(); // 相手の手番から開始

        loop {
            // 次に to に利く最も価値の低い駒を探す
            let attackers = self.attackers_to_occ(to, occupied) & occupied;
            let our_attackers = attackers & self.pieces_c(stm);

            if our_attackers.is_empty() {
                // 取り返す駒がない → 現在の手番の負け
                break;
            }

            let (attacker_sq, attacker_value) = self.least_valuable_attacker(our_attackers, stm);

            // 駒を取り除くと、その後ろの遠方駒が次回の走査で現れる
            occupied ^= Bitboard::from_square(attacker_sq);

            balance = -balance - 1 - victim_value;
            victim_value = attacker_value;

            if balance >= 0 {
                // 玉で取り返した場合、相手にまだ攻撃駒が残っていれば
                // 玉は取られてしまうので手番を渡して続行
                if attacker_value == see_piece_value(PieceType::King) {
                    let their_attackers =
                        self.attackers_to_occ(to, occupied) & occupied & self.pieces_c(!stm);
                    if their_attackers.is_not_empty() {
                        stm = !stm;
                        continue;
                    }
                }
                break;
            }

            stm = !stm;
        }

        // 最後に手番を持っていた側が勝ち
        stm != self.side_to_move()
    }

    /// 最も価値の低い攻撃駒を探す
    ///
    /// PieceType::ALLはポーンから玉への価値順なのでそのまま走査する。
    fn least_valuable_attacker(&self, attackers: Bitboard, stm: Color) -> (Square, i32) {
        for pt in PieceType::ALL {
            let bb = attackers & self.pieces(stm, pt);
            if bb.is_not_empty() {
                return (bb.lsb_unchecked(), see_piece_value(pt));
            }
        }

        // attackersが空でない限りここには来ない
        debug_assert!(attackers.is_empty());
        (Square::A1, 0)
    }
}

/// SEE用の駒価値（centipawn）
fn see_piece_value(pt: PieceType) -> i32 {
    use PieceType::*;
    match pt {
        Pawn => 100,
        Knight => 320,
        Bishop => 330,
        Rook => 500,
        Queen => 900,
        King => 20000,
    }
}
