//! FEN形式の解析・出力

use log::debug;

use crate::bitboard::pawn_attacks;
use crate::types::{Color, File, Piece, PieceType, Rank, Square};

use super::pos::{pawn_push, Position};

/// 初期局面のFEN
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// 初期局面を生成
    pub fn startpos() -> Position {
        Position::from_fen(START_FEN)
    }

    /// FEN文字列から局面を生成
    pub fn from_fen(fen: &str) -> Position {
        let mut pos = Position::new();
        pos.set_fen(fen);
        pos
    }

    /// FEN文字列から局面を設定
    ///
    /// 解釈は寛容で、失敗しない。認識できない文字は読み飛ばし、
    /// 欠けたフィールドは既定値（白番、権利なし、ep無し、カウンタ0）で補う。
    pub fn set_fen(&mut self, fen: &str) {
        *self = Position::new();

        let mut parts = fen.split_whitespace();

        // 1. 盤面（8段目から1段目、各段はaファイルから）
        if let Some(board_str) = parts.next() {
            self.parse_board(board_str);
        }

        // 2. 手番
        self.side_to_move = match parts.next() {
            Some("b") => Color::Black,
            _ => Color::White,
        };

        // 3. キャスリング権
        if let Some(castling_str) = parts.next() {
            self.parse_castling(castling_str);
        }

        // 4. アンパッサン対象マス（妥当でない場合は破棄）
        if let Some(ep_str) = parts.next() {
            self.parse_en_passant(ep_str);
        }

        // 5. 50手ルールカウンタ
        self.state.rule50 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);

        // 6. 総手数（1始まり）からplyへ変換
        let fullmove: i32 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        self.game_ply =
            ((fullmove - 1) * 2).max(0) + if self.side_to_move == Color::Black { 1 } else { 0 };

        // ハッシュ・王手情報・pin情報の再計算
        self.refresh_state();
    }

    fn parse_board(&mut self, board_str: &str) {
        let mut file = 0usize;
        let mut rank = 7i32;

        for c in board_str.chars() {
            match c {
                '/' => {
                    rank -= 1;
                    file = 0;
                    if rank < 0 {
                        break;
                    }
                }
                '1'..='8' => {
                    file += (c as u8 - b'0') as usize;
                }
                _ => {
                    if let Some(pc) = Piece::from_fen_char(c) {
                        if file < 8 {
                            let sq =
                                Square::new(File::ALL[file], Rank::ALL[rank as usize]);
                            // piece_listの容量(16)を超える駒はマスだけ消費して捨てる
                            if (self.piece_count[pc.index()] as usize)
                                < self.piece_list[pc.index()].len()
                            {
                                self.put_piece(pc, sq);
                            } else {
                                debug!("FEN: too many '{}' pieces, ignoring {:?}", c, sq);
                            }
                            file += 1;
                        }
                    }
                    // 認識できない文字は読み飛ばす
                }
            }
        }
    }

    fn parse_castling(&mut self, castling_str: &str) {
        for c in castling_str.chars() {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };

            // 該当色の玉がいなければ登録できない
            if self.pieces(color, PieceType::King).is_empty() {
                continue;
            }
            let ksq = self.king_square(color);
            let rook = Piece::new(color, PieceType::Rook);
            let back_rank = Rank::Rank1.relative(color);

            let rfrom = match c.to_ascii_uppercase() {
                // 玉から外側へ走査して実際のルークを探す
                'K' => self.scan_for_rook(rook, ksq, 1),
                'Q' => self.scan_for_rook(rook, ksq, -1),
                // Shredder形式: ファイル文字で直接指定
                'A'..='H' => {
                    let f = File::ALL[(c.to_ascii_uppercase() as u8 - b'A') as usize];
                    let sq = Square::new(f, back_rank);
                    (self.piece_on(sq) == rook).then_some(sq)
                }
                _ => None,
            };

            if let Some(rfrom) = rfrom {
                self.set_castling_right(color, rfrom);
            }
        }
    }

    /// 玉の位置から指定方向の端に向けてルークを探す
    fn scan_for_rook(&self, rook: Piece, ksq: Square, dir: i8) -> Option<Square> {
        let rank = ksq.rank();
        let mut f = ksq.file() as i8 + dir;
        while (0..8).contains(&f) {
            let sq = Square::new(File::ALL[f as usize], rank);
            if self.piece_on(sq) == rook {
                return Some(sq);
            }
            f += dir;
        }
        None
    }

    fn parse_en_passant(&mut self, ep_str: &str) {
        let Some(ep) = Square::from_algebraic(ep_str) else {
            return;
        };

        let us = self.side_to_move;
        let them = !us;

        // 妥当性: 自分のポーンがそのマスに利いていて、
        // 2マス進んだ敵のポーンが1マス先にいること
        let capturers = pawn_attacks(them, ep) & self.pieces(us, PieceType::Pawn);
        let pushed_pawn = ep
            .offset(pawn_push(them))
            .map(|s| self.piece_on(s) == Piece::new(them, PieceType::Pawn))
            .unwrap_or(false);

        if capturers.is_not_empty() && pushed_pawn {
            self.state.ep_square = Some(ep);
        } else {
            debug!("discarding implausible en-passant square {ep_str}");
        }
    }

    /// 現局面のFEN文字列を取得
    pub fn to_fen(&self) -> String {
        let mut result = String::new();

        // 1. 盤面
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let sq = Square::new(File::ALL[file], Rank::ALL[rank]);
                let pc = self.piece_on(sq);
                if pc.is_none() {
                    empty_count += 1;
                } else {
                    if empty_count > 0 {
                        result.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    result.push(pc.to_fen_char());
                }
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                result.push('/');
            }
        }

        // 2. 手番
        result.push(' ');
        result.push(self.side_to_move().to_fen_char());

        // 3. キャスリング権
        result.push(' ');
        if self.castling_rights().is_empty() {
            result.push('-');
        } else {
            for cr in self.castling_rights().iter() {
                result.push(cr.to_fen_char());
            }
        }

        // 4. アンパッサン対象マス
        result.push(' ');
        match self.ep_square() {
            Some(ep) => result.push_str(&ep.to_algebraic()),
            None => result.push('-'),
        }

        // 5. 50手ルールカウンタと総手数
        result.push_str(&format!(
            " {} {}",
            self.rule50_count(),
            self.game_ply() / 2 + 1
        ));

        result
    }
}
