//! 局面（Position）

use crate::bitboard::{
    aligned, between_bb, bishop_effect, king_effect, knight_effect, pawn_attacks,
    rook_effect, Bitboard,
};
use crate::types::{CastlingRights, Color, Move, MoveKind, Piece, PieceType, Rank, Square};

use super::state::StateInfo;
use super::zobrist::{zobrist_castling, zobrist_en_passant, zobrist_psq, zobrist_side};

/// ポーンの前進方向（Square差分）
#[inline]
pub(super) const fn pawn_push(c: Color) -> i8 {
    match c {
        Color::White => 8,
        Color::Black => -8,
    }
}

/// チェスの局面
///
/// 分岐して読むときは `clone()` してから `do_move` する設計
/// （undoスタックは持たない）。
#[derive(Clone)]
pub struct Position {
    // === 盤面 ===
    /// 各マスの駒 [Square]
    pub(super) board: [Piece; Square::NUM],
    /// 駒種別Bitboard [PieceType]（色は問わない）
    pub(super) by_type: [Bitboard; PieceType::NUM + 1],
    /// 先後別Bitboard
    pub(super) by_color: [Bitboard; Color::NUM],

    // === 駒リスト ===
    /// 駒ごとの位置リスト [Piece.index()]（先頭piece_count個が有効）
    pub(super) piece_list: [[Square; 16]; Piece::NUM],
    /// 駒ごとの枚数 [Piece.index()]
    pub(super) piece_count: [u8; Piece::NUM],
    /// 各マスの駒がpiece_list内のどこにあるか [Square]
    pub(super) index: [u8; Square::NUM],

    // === キャスリング登録情報 ===
    /// そのマスの駒が動くと失われる権利 [Square]
    pub(super) castling_rights_mask: [CastlingRights; Square::NUM],
    /// 各権利に対応するルークの初期位置 [CastlingRight.index()]
    pub(super) castling_rook_square: [Option<Square>; 4],
    /// キャスリング経路（空いている必要があるマス） [CastlingRight.index()]
    pub(super) castling_path: [Bitboard; 4],

    // === 状態 ===
    /// 現在の状態
    pub(super) state: StateInfo,
    /// 初期局面からの手数（ply）
    pub(super) game_ply: i32,
    /// 手番
    pub(super) side_to_move: Color,
    /// 玉の位置 [Color]
    pub(super) king_square: [Square; Color::NUM],
}

impl Position {
    // ========== 局面設定 ==========

    /// 空の局面を生成
    pub fn new() -> Self {
        Position {
            board: [Piece::NONE; Square::NUM],
            by_type: [Bitboard::EMPTY; PieceType::NUM + 1],
            by_color: [Bitboard::EMPTY; Color::NUM],
            piece_list: [[Square::A1; 16]; Piece::NUM],
            piece_count: [0; Piece::NUM],
            index: [0; Square::NUM],
            castling_rights_mask: [CastlingRights::NONE; Square::NUM],
            castling_rook_square: [None; 4],
            castling_path: [Bitboard::EMPTY; 4],
            state: StateInfo::new(),
            game_ply: 0,
            side_to_move: Color::White,
            king_square: [Square::A1; Color::NUM],
        }
    }

    // ========== 盤面アクセス ==========

    /// 指定マスの駒を取得
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    /// 全駒のBitboard
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// 駒種別のBitboard（色は問わない）
    #[inline]
    pub fn pieces_pt(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt as usize]
    }

    /// 手番別のBitboard
    #[inline]
    pub fn pieces_c(&self, c: Color) -> Bitboard {
        self.by_color[c.index()]
    }

    /// 手番と駒種のBitboard
    #[inline]
    pub fn pieces(&self, c: Color, pt: PieceType) -> Bitboard {
        self.by_type[pt as usize] & self.by_color[c.index()]
    }

    /// 駒の枚数
    #[inline]
    pub fn count(&self, pc: Piece) -> usize {
        self.piece_count[pc.index()] as usize
    }

    /// 駒の位置リスト（先頭count個が有効）
    #[inline]
    pub fn squares_of(&self, pc: Piece) -> &[Square] {
        &self.piece_list[pc.index()][..self.piece_count[pc.index()] as usize]
    }

    /// 玉の位置
    #[inline]
    pub fn king_square(&self, c: Color) -> Square {
        self.king_square[c.index()]
    }

    /// 手番
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 初期局面からの手数（ply）
    #[inline]
    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    /// 現在の状態を取得
    #[inline]
    pub fn state(&self) -> &StateInfo {
        &self.state
    }

    /// 局面ハッシュ
    #[inline]
    pub fn key(&self) -> u64 {
        self.state.key
    }

    /// アンパッサン対象マス
    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.state.ep_square
    }

    /// 50手ルールカウンタ（ply単位）
    #[inline]
    pub fn rule50_count(&self) -> i32 {
        self.state.rule50
    }

    /// キャスリング権
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state.castling_rights
    }

    /// 50手ルールによる引き分けか（100ply到達で成立）
    #[inline]
    pub fn is_draw(&self) -> bool {
        self.state.rule50 >= 100
    }

    // ========== 利き ==========

    /// 指定マスに利いている駒（全手番）
    pub fn attackers_to(&self, sq: Square) -> Bitboard {
        self.attackers_to_occ(sq, self.occupied())
    }

    /// 指定マスに利いている駒（占有指定）
    pub fn attackers_to_occ(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        // 各駒種から逆方向に利きを求める
        // 例: sqに白ポーンで利いている駒 = sqから黒ポーンの利き方向にある白ポーン
        let w_pawn = pawn_attacks(Color::Black, sq) & self.pieces(Color::White, PieceType::Pawn);
        let b_pawn = pawn_attacks(Color::White, sq) & self.pieces(Color::Black, PieceType::Pawn);

        let knight = knight_effect(sq) & self.pieces_pt(PieceType::Knight);
        let king = king_effect(sq) & self.pieces_pt(PieceType::King);

        let rook_movers = self.pieces_pt(PieceType::Rook) | self.pieces_pt(PieceType::Queen);
        let rook = rook_effect(sq, occupied) & rook_movers;

        let bishop_movers = self.pieces_pt(PieceType::Bishop) | self.pieces_pt(PieceType::Queen);
        let bishop = bishop_effect(sq, occupied) & bishop_movers;

        w_pawn | b_pawn | knight | king | rook | bishop
    }

    /// 指定マスに利いている指定手番の駒
    pub fn attackers_to_c(&self, sq: Square, c: Color) -> Bitboard {
        self.attackers_to(sq) & self.pieces_c(c)
    }

    /// 自玉へのpin候補駒（両陣営の駒を含む）
    #[inline]
    pub fn blockers_for_king(&self, c: Color) -> Bitboard {
        self.state.blockers_for_king[c.index()]
    }

    /// c の玉をpinしている敵の遠方駒
    #[inline]
    pub fn pinners(&self, c: Color) -> Bitboard {
        self.state.pinners[c.index()]
    }

    /// c の玉にpinされている c 自身の駒
    #[inline]
    pub fn pinned_pieces(&self, c: Color) -> Bitboard {
        self.state.blockers_for_king[c.index()] & self.pieces_c(c)
    }

    /// 動くと開き王手になりうる手番側の駒
    #[inline]
    pub fn discovered_check_candidates(&self) -> Bitboard {
        self.state.blockers_for_king[(!self.side_to_move).index()] & self.pieces_c(self.side_to_move)
    }

    /// 王手している駒
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.state.checkers
    }

    /// 王手されているか
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.state.checkers.is_empty()
    }

    /// 指定駒種で相手玉に王手となる升
    #[inline]
    pub fn check_squares(&self, pt: PieceType) -> Bitboard {
        self.state.check_squares[pt as usize]
    }

    // ========== 内部操作 ==========

    /// 盤面に駒を置く
    pub(super) fn put_piece(&mut self, pc: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none());
        self.board[sq.index()] = pc;
        self.by_type[pc.piece_type() as usize].set(sq);
        self.by_color[pc.color().index()].set(sq);

        let count = self.piece_count[pc.index()];
        self.piece_list[pc.index()][count as usize] = sq;
        self.index[sq.index()] = count;
        self.piece_count[pc.index()] = count + 1;

        if pc.piece_type() == PieceType::King {
            self.king_square[pc.color().index()] = sq;
        }
    }

    /// 盤面から駒を取り除く
    ///
    /// リストの末尾要素を抜けた位置へスワップして詰める（順序は保たれない）。
    pub(super) fn remove_piece(&mut self, pc: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()] == pc);
        self.board[sq.index()] = Piece::NONE;
        self.by_type[pc.piece_type() as usize].clear(sq);
        self.by_color[pc.color().index()].clear(sq);

        let count = self.piece_count[pc.index()] - 1;
        let last = self.piece_list[pc.index()][count as usize];
        let removed_idx = self.index[sq.index()];
        self.piece_list[pc.index()][removed_idx as usize] = last;
        self.index[last.index()] = removed_idx;
        self.piece_count[pc.index()] = count;
    }

    /// 駒を移動する
    pub(super) fn move_piece(&mut self, pc: Piece, from: Square, to: Square) {
        debug_assert!(self.board[from.index()] == pc);
        debug_assert!(self.board[to.index()].is_none());
        self.board[from.index()] = Piece::NONE;
        self.board[to.index()] = pc;
        let from_to = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.by_type[pc.piece_type() as usize] ^= from_to;
        self.by_color[pc.color().index()] ^= from_to;

        let idx = self.index[from.index()];
        self.index[to.index()] = idx;
        self.piece_list[pc.index()][idx as usize] = to;

        if pc.piece_type() == PieceType::King {
            self.king_square[pc.color().index()] = to;
        }
    }

    // ========== 王手情報 ==========

    /// マスsへ遠方駒sliders側から向かうpin関係を計算
    ///
    /// 戻り値は (blockers, pinners)。sniperとsの間に駒がちょうど1枚の
    /// ときのみその駒がblockerになり、blockerがs上の駒と同じ陣営なら
    /// sniperはpinnerとして記録される。
    pub(super) fn slider_blockers(&self, sliders: Bitboard, s: Square) -> (Bitboard, Bitboard) {
        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;
        let occupied = self.occupied();

        let rook_movers = self.pieces_pt(PieceType::Rook) | self.pieces_pt(PieceType::Queen);
        let bishop_movers = self.pieces_pt(PieceType::Bishop) | self.pieces_pt(PieceType::Queen);

        // 空盤面での利きにいる遠方駒がsniper
        let snipers = ((rook_effect(s, Bitboard::EMPTY) & rook_movers)
            | (bishop_effect(s, Bitboard::EMPTY) & bishop_movers))
            & sliders;

        let s_color = self.piece_on(s).color();

        for sniper_sq in snipers.iter() {
            let between = between_bb(s, sniper_sq) & occupied;
            if between.is_not_empty() && !between.more_than_one() {
                blockers |= between;
                if (between & self.pieces_c(s_color)).is_not_empty() {
                    pinners.set(sniper_sq);
                }
            }
        }

        (blockers, pinners)
    }

    /// pin駒とpinしている駒を両陣営ぶん更新
    pub(super) fn update_blockers_and_pinners(&mut self) {
        for c in [Color::White, Color::Black] {
            let ksq = self.king_square[c.index()];
            let (blockers, pinners) = self.slider_blockers(self.pieces_c(!c), ksq);
            self.state.blockers_for_king[c.index()] = blockers;
            self.state.pinners[c.index()] = pinners;
        }
    }

    /// 相手玉への王手マスを更新
    pub(super) fn update_check_squares(&mut self) {
        let them = !self.side_to_move;
        let ksq = self.king_square[them.index()];
        let occupied = self.occupied();

        self.state.check_squares[PieceType::Pawn as usize] = pawn_attacks(them, ksq);
        self.state.check_squares[PieceType::Knight as usize] = knight_effect(ksq);
        self.state.check_squares[PieceType::Bishop as usize] = bishop_effect(ksq, occupied);
        self.state.check_squares[PieceType::Rook as usize] = rook_effect(ksq, occupied);
        self.state.check_squares[PieceType::Queen as usize] = self.state.check_squares
            [PieceType::Bishop as usize]
            | self.state.check_squares[PieceType::Rook as usize];
        // 玉で王手はない
        self.state.check_squares[PieceType::King as usize] = Bitboard::EMPTY;
    }

    /// FEN読み込み後などに状態を全計算し直す
    pub(super) fn refresh_state(&mut self) {
        self.state.key = self.compute_key();
        let us = self.side_to_move;
        self.state.checkers = self.attackers_to_c(self.king_square(us), !us);
        self.update_blockers_and_pinners();
        self.update_check_squares();
    }

    /// Zobristハッシュをゼロから計算
    pub(super) fn compute_key(&self) -> u64 {
        let mut key = 0u64;
        for sq in Square::all() {
            let pc = self.piece_on(sq);
            if pc.is_some() {
                key ^= zobrist_psq(pc, sq);
            }
        }
        if self.side_to_move == Color::Black {
            key ^= zobrist_side();
        }
        key ^= zobrist_castling(self.state.castling_rights.raw());
        if let Some(ep) = self.state.ep_square {
            key ^= zobrist_en_passant(ep);
        }
        key
    }

    // ========== 合法性判定 ==========

    /// 疑似合法手が合法か（自玉を王手に晒さないか）を判定
    ///
    /// 呼び出し側が疑似合法性（駒の動きとして成立していること）を保証する。
    pub fn legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();

        debug_assert!(self.piece_on(from).color() == us);

        if m.is_en_passant() {
            // 動かすポーンと取られるポーンを両方外した占有で
            // 自玉への遠方駒の利きを確かめる
            let ksq = self.king_square(us);
            // SAFETY: アンパッサンのtoは3/6段目なので±8は盤内
            let capsq = unsafe { Square::from_u8_unchecked((to.raw() as i8 - pawn_push(us)) as u8) };
            let occupied = (self.occupied()
                ^ Bitboard::from_square(from)
                ^ Bitboard::from_square(capsq))
                | Bitboard::from_square(to);

            let enemy_rooks = self.pieces(them, PieceType::Rook) | self.pieces(them, PieceType::Queen);
            let enemy_bishops =
                self.pieces(them, PieceType::Bishop) | self.pieces(them, PieceType::Queen);

            return (rook_effect(ksq, occupied) & enemy_rooks).is_empty()
                && (bishop_effect(ksq, occupied) & enemy_bishops).is_empty();
        }

        if m.is_castling() {
            // キングの通過マスが攻撃されていないこと
            let kto = if to.raw() > from.raw() {
                Square::G1.relative(us)
            } else {
                Square::C1.relative(us)
            };
            let step: i8 = if kto.raw() > from.raw() { -1 } else { 1 };
            let mut s = kto;
            while s != from {
                if self.attackers_to_c(s, them).is_not_empty() {
                    return false;
                }
                // SAFETY: fromに到達するまで同一段内を1マスずつ進む
                s = unsafe { Square::from_u8_unchecked((s.raw() as i8 + step) as u8) };
            }

            // ルークが退くことで玉が遠方駒に晒されないこと
            // （FEN由来の非標準ルーク位置を考慮）
            let enemy_rooks = self.pieces(them, PieceType::Rook) | self.pieces(them, PieceType::Queen);
            return (rook_effect(kto, self.occupied() ^ Bitboard::from_square(to)) & enemy_rooks)
                .is_empty();
        }

        if self.piece_on(from).piece_type() == PieceType::King {
            // 玉自身を占有から外して移動先の利きを調べる
            // （後退して遠方駒の利きの延長線上に逃げる手を弾くため）
            return (self
                .attackers_to_occ(to, self.occupied() ^ Bitboard::from_square(from))
                & self.pieces_c(them))
            .is_empty();
        }

        // 玉以外の駒はpinされていないか、pinの直線上を動くなら合法
        !self.blockers_for_king(us).contains(from) || aligned(from, to, self.king_square(us))
    }

    // ========== 王手判定 ==========

    /// 指し手が相手玉に王手となるか
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();
        let ksq = self.king_square(!us);

        debug_assert!(self.piece_on(from).color() == us);

        // 直接王手：移動先が王手マスにあるか
        if self.check_squares(self.piece_on(from).piece_type()).contains(to) {
            return true;
        }

        // 開き王手：fromがblockerで、玉との直線から外れるか
        if self.blockers_for_king(!us).contains(from) && !aligned(from, to, ksq) {
            return true;
        }

        match m.kind() {
            MoveKind::Normal => false,

            MoveKind::Promotion => {
                // 成った駒の利きを、ポーンの元位置を外した占有で調べる
                let occupied = self.occupied() ^ Bitboard::from_square(from);
                let effect = match m.promotion_type() {
                    PieceType::Knight => knight_effect(to),
                    PieceType::Bishop => bishop_effect(to, occupied),
                    PieceType::Rook => rook_effect(to, occupied),
                    _ => bishop_effect(to, occupied) | rook_effect(to, occupied),
                };
                effect.contains(ksq)
            }

            MoveKind::EnPassant => {
                // 取る側と取られる側の2マスが同時に空く
                // SAFETY: アンパッサンのcapsqはtoとfromの交点で盤内
                let capsq = unsafe {
                    Square::from_u8_unchecked(
                        (to.file() as u8) | ((from.rank() as u8) << 3),
                    )
                };
                let occupied = (self.occupied()
                    ^ Bitboard::from_square(from)
                    ^ Bitboard::from_square(capsq))
                    | Bitboard::from_square(to);

                let our_rooks = self.pieces(us, PieceType::Rook) | self.pieces(us, PieceType::Queen);
                let our_bishops =
                    self.pieces(us, PieceType::Bishop) | self.pieces(us, PieceType::Queen);

                (rook_effect(ksq, occupied) & our_rooks).is_not_empty()
                    || (bishop_effect(ksq, occupied) & our_bishops).is_not_empty()
            }

            MoveKind::Castling => {
                // キャスリング後のルークが相手玉に利くか
                let kfrom = from;
                let rfrom = to;
                let king_side = rfrom.raw() > kfrom.raw();
                let kto = if king_side { Square::G1 } else { Square::C1 }.relative(us);
                let rto = if king_side { Square::F1 } else { Square::D1 }.relative(us);

                let occupied = (self.occupied()
                    ^ Bitboard::from_square(kfrom)
                    ^ Bitboard::from_square(rfrom))
                    | Bitboard::from_square(kto)
                    | Bitboard::from_square(rto);

                rook_effect(rto, occupied).contains(ksq)
            }
        }
    }

    // ========== 指し手実行 ==========

    /// キャスリングの駒移動（do_move内部用）
    ///
    /// 先に両方取り除いてから置くことで、kto/rtoがkfrom/rfromと
    /// 重なる非標準配置でも正しく処理できる。戻り値は (kto, rto)。
    fn do_castling(&mut self, us: Color, kfrom: Square, rfrom: Square) -> (Square, Square) {
        let king_side = rfrom.raw() > kfrom.raw();
        let kto = if king_side { Square::G1 } else { Square::C1 }.relative(us);
        let rto = if king_side { Square::F1 } else { Square::D1 }.relative(us);

        let king = Piece::new(us, PieceType::King);
        let rook = Piece::new(us, PieceType::Rook);

        self.remove_piece(king, kfrom);
        self.remove_piece(rook, rfrom);
        self.put_piece(king, kto);
        self.put_piece(rook, rto);

        (kto, rto)
    }

    /// 指し手を実行
    ///
    /// `gives_check` は事前に `gives_check(m)` で求めた値を渡す。
    /// 合法性は呼び出し側が保証する。
    pub fn do_move(&mut self, m: Move, gives_check: bool) {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let pc = self.piece_on(from);

        debug_assert!(pc.is_some() && pc.color() == us);

        // 1. カウンタ更新
        self.game_ply += 1;
        self.state.rule50 += 1;
        self.state.plies_from_null += 1;
        self.state.key ^= zobrist_side();

        // 2. キャスリングの駒移動
        if m.is_castling() {
            let (kto, rto) = self.do_castling(us, from, to);
            let king = Piece::new(us, PieceType::King);
            let rook = Piece::new(us, PieceType::Rook);
            self.state.key ^= zobrist_psq(king, from) ^ zobrist_psq(king, kto);
            self.state.key ^= zobrist_psq(rook, to) ^ zobrist_psq(rook, rto);
        }

        // 3. 駒を取る場合（アンパッサンは取られる駒の位置が異なる）
        let captured = if m.is_en_passant() {
            Piece::new(them, PieceType::Pawn)
        } else if m.is_castling() {
            // toには自分のルークがいるが捕獲ではない
            Piece::NONE
        } else {
            self.piece_on(to)
        };

        if captured.is_some() {
            let capsq = if m.is_en_passant() {
                // SAFETY: アンパッサンのtoは3/6段目なので±8は盤内
                unsafe { Square::from_u8_unchecked((to.raw() as i8 - pawn_push(us)) as u8) }
            } else {
                to
            };
            self.remove_piece(captured, capsq);
            self.state.key ^= zobrist_psq(captured, capsq);
            self.state.rule50 = 0;
        }
        self.state.captured_piece = captured;

        // 4. アンパッサン状態のリセット
        if let Some(ep) = self.state.ep_square.take() {
            self.state.key ^= zobrist_en_passant(ep);
        }

        // 5. キャスリング権の剥奪（from/toに紐づく権利）
        let rights_mask =
            self.castling_rights_mask[from.index()].raw() | self.castling_rights_mask[to.index()].raw();
        if !self.state.castling_rights.is_empty() && rights_mask != 0 {
            self.state.key ^= zobrist_castling(self.state.castling_rights.raw());
            self.state.castling_rights.remove_mask(rights_mask);
            self.state.key ^= zobrist_castling(self.state.castling_rights.raw());
        }

        // 6. 駒の移動（キャスリングは処理済み）
        if !m.is_castling() {
            self.move_piece(pc, from, to);
            self.state.key ^= zobrist_psq(pc, from) ^ zobrist_psq(pc, to);
        }

        // 7. ポーン固有の処理
        if pc.piece_type() == PieceType::Pawn {
            if (to.raw() as i8 - from.raw() as i8).abs() == 16 {
                // 2マス進み：敵ポーンが取れる場合のみアンパッサン対象を設定
                // SAFETY: fromは2/7段目なので±8は盤内
                let ep =
                    unsafe { Square::from_u8_unchecked((from.raw() as i8 + pawn_push(us)) as u8) };
                if (pawn_attacks(us, ep) & self.pieces(them, PieceType::Pawn)).is_not_empty() {
                    self.state.ep_square = Some(ep);
                    self.state.key ^= zobrist_en_passant(ep);
                }
            } else if m.is_promotion() {
                let promotion = Piece::new(us, m.promotion_type());
                self.remove_piece(pc, to);
                self.put_piece(promotion, to);
                self.state.key ^= zobrist_psq(pc, to) ^ zobrist_psq(promotion, to);
            }

            // ポーンを動かしたら50手カウンタはリセット
            self.state.rule50 = 0;
        }

        // 8. 王手情報（移動後の盤面で相手玉への利きを求める）
        self.state.checkers = if gives_check {
            self.attackers_to_c(self.king_square(them), us)
        } else {
            Bitboard::EMPTY
        };

        // 9. 手番交代とpin/王手マスの更新
        self.side_to_move = them;
        self.update_blockers_and_pinners();
        self.update_check_squares();
    }

    /// null move（パス）を実行
    ///
    /// 王手されていない局面でのみ呼び出せる。
    pub fn do_null_move(&mut self) {
        debug_assert!(!self.in_check());

        self.state.key ^= zobrist_side();
        if let Some(ep) = self.state.ep_square.take() {
            self.state.key ^= zobrist_en_passant(ep);
        }

        self.game_ply += 1;
        self.state.rule50 += 1;
        self.state.plies_from_null = 0;
        self.state.captured_piece = Piece::NONE;

        self.side_to_move = !self.side_to_move;

        self.state.checkers = Bitboard::EMPTY;
        self.update_blockers_and_pinners();
        self.update_check_squares();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Position {{")?;
        for rank in (0..8).rev() {
            write!(f, "  ")?;
            for file in 0..8 {
                let sq = Square::new(
                    crate::types::File::ALL[file],
                    Rank::ALL[rank],
                );
                let pc = self.piece_on(sq);
                write!(f, "{}", if pc.is_some() { pc.to_fen_char() } else { '.' })?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  side_to_move: {:?}", self.side_to_move)?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_position_new() {
        let pos = Position::new();
        assert!(pos.occupied().is_empty());
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.game_ply(), 0);
    }

    #[test]
    fn test_put_and_remove_piece() {
        let mut pos = Position::new();
        pos.put_piece(Piece::W_ROOK, sq("a1"));
        pos.put_piece(Piece::W_ROOK, sq("h1"));
        assert_eq!(pos.count(Piece::W_ROOK), 2);
        assert_eq!(pos.piece_on(sq("a1")), Piece::W_ROOK);
        assert!(pos.pieces(Color::White, PieceType::Rook).contains(sq("h1")));

        // スワップ除去後もリストが正しい集合を表すこと
        pos.remove_piece(Piece::W_ROOK, sq("a1"));
        assert_eq!(pos.count(Piece::W_ROOK), 1);
        assert_eq!(pos.squares_of(Piece::W_ROOK), &[sq("h1")]);
        assert!(pos.piece_on(sq("a1")).is_none());
    }

    #[test]
    fn test_move_piece_updates_king_cache() {
        let mut pos = Position::new();
        pos.put_piece(Piece::W_KING, sq("e1"));
        assert_eq!(pos.king_square(Color::White), sq("e1"));
        pos.move_piece(Piece::W_KING, sq("e1"), sq("e2"));
        assert_eq!(pos.king_square(Color::White), sq("e2"));
        assert!(pos.piece_on(sq("e1")).is_none());
    }

    #[test]
    fn test_attackers_to() {
        let mut pos = Position::new();
        pos.put_piece(Piece::W_PAWN, sq("e4"));
        pos.put_piece(Piece::B_PAWN, sq("d5"));
        pos.put_piece(Piece::W_ROOK, sq("d1"));
        pos.put_piece(Piece::W_KING, sq("a1"));
        pos.put_piece(Piece::B_KING, sq("h8"));

        let attackers = pos.attackers_to(sq("d5"));
        assert!(attackers.contains(sq("e4"))); // ポーンの斜め利き
        assert!(attackers.contains(sq("d1"))); // ルークの縦利き
        assert_eq!(attackers.count(), 2);

        // 間に駒が入るとルークの利きが遮られる
        pos.put_piece(Piece::B_KNIGHT, sq("d3"));
        let attackers = pos.attackers_to(sq("d5"));
        assert!(!attackers.contains(sq("d1")));
    }

    #[test]
    fn test_do_move_normal() {
        let mut pos = Position::from_fen(START_FEN);
        let m = Move::new_move(sq("e2"), sq("e4"));
        assert!(!pos.gives_check(m));
        pos.do_move(m, false);

        assert!(pos.piece_on(sq("e2")).is_none());
        assert_eq!(pos.piece_on(sq("e4")), Piece::W_PAWN);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.game_ply(), 1);
        assert_eq!(pos.rule50_count(), 0);
        // 黒にe4のポーンを取れるポーンはいないのでepは立たない
        assert_eq!(pos.ep_square(), None);
    }

    #[test]
    fn test_do_move_sets_ep_square() {
        let mut pos = Position::from_fen(START_FEN);
        pos.do_move(Move::new_move(sq("e2"), sq("e4")), false);
        pos.do_move(Move::new_move(sq("d7"), sq("d5")), false);
        // e4-e5, d5はそのまま、f7-f5でepが立つ
        pos.do_move(Move::new_move(sq("e4"), sq("e5")), false);
        pos.do_move(Move::new_move(sq("f7"), sq("f5")), false);
        assert_eq!(pos.ep_square(), Some(sq("f6")));

        // アンパッサンの実行
        let m = Move::new_en_passant(sq("e5"), sq("f6"));
        assert!(pos.legal(m));
        pos.do_move(m, pos.gives_check(m));
        assert_eq!(pos.piece_on(sq("f6")), Piece::W_PAWN);
        assert!(pos.piece_on(sq("f5")).is_none());
        assert_eq!(pos.state().captured_piece, Piece::B_PAWN);
    }

    #[test]
    fn test_do_move_capture_resets_rule50() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 12 34");
        assert_eq!(pos.rule50_count(), 12);
        pos.do_move(Move::new_move(sq("e4"), sq("d5")), false);
        assert_eq!(pos.rule50_count(), 0);
        assert_eq!(pos.state().captured_piece, Piece::B_PAWN);
    }

    #[test]
    fn test_do_move_promotion() {
        let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let m = Move::new_promotion(sq("a7"), sq("a8"), PieceType::Queen);
        let check = pos.gives_check(m);
        assert!(check); // a8のクイーンはe8にランクで利く
        pos.do_move(m, check);
        assert_eq!(pos.piece_on(sq("a8")), Piece::W_QUEEN);
        assert_eq!(pos.pieces(Color::White, PieceType::Pawn).count(), 0);
        assert!(pos.in_check());
    }

    #[test]
    fn test_do_move_castling() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = Move::new_castling(Square::E1, Square::H1);
        assert!(pos.legal(m));
        pos.do_move(m, pos.gives_check(m));

        assert_eq!(pos.piece_on(sq("g1")), Piece::W_KING);
        assert_eq!(pos.piece_on(sq("f1")), Piece::W_ROOK);
        assert!(pos.piece_on(sq("e1")).is_none());
        assert!(pos.piece_on(sq("h1")).is_none());
        // 白の権利は両方消え、黒の権利は残る
        assert!(!pos.castling_rights().has_color(Color::White));
        assert!(pos.castling_rights().has_color(Color::Black));
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        // 黒ルークがf1を睨んでいるのでキングサイドは不可
        let pos = Position::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1");
        assert!(!pos.legal(Move::new_castling(Square::E1, Square::H1)));
        // キングの通過マス（d1, c1）は攻撃されていないのでクイーンサイドは可
        assert!(pos.legal(Move::new_castling(Square::E1, Square::A1)));
    }

    #[test]
    fn test_legal_pinned_piece() {
        // d2の白ルークはd8の黒ルークによって縦にpinされている
        let pos = Position::from_fen("3rk3/8/8/8/8/8/3R4/3K4 w - - 0 1");
        let pinned = pos.pinned_pieces(Color::White);
        assert!(pinned.contains(sq("d2")));

        // pinの直線（d筋）に沿った移動は合法
        assert!(pos.legal(Move::new_move(sq("d2"), sq("d4"))));
        // 直線から外れる移動は非合法
        assert!(!pos.legal(Move::new_move(sq("d2"), sq("e2"))));
    }

    #[test]
    fn test_slider_blockers_reports_pinner_and_blocker() {
        // d筋のpin: d8の黒ルークがpinner、d2の白ルークがblocker
        let pos = Position::from_fen("3rk3/8/8/8/8/8/3R4/3K4 w - - 0 1");
        assert_eq!(pos.pinners(Color::White), Bitboard::from_square(sq("d8")));
        assert!(pos.blockers_for_king(Color::White).contains(sq("d2")));

        // 斜めのpin: e1の玉とd2の白ビショップをa5のクイーンが貫く
        let pos = Position::from_fen("4k3/8/8/q7/8/8/3B4/4K3 w - - 0 1");
        assert_eq!(pos.pinners(Color::White), Bitboard::from_square(sq("a5")));
        assert!(pos.blockers_for_king(Color::White).contains(sq("d2")));
        // blockerとpinnerの間にもう1枚挟まるとpinは成立しない
        let pos = Position::from_fen("4k3/8/8/q7/8/2P5/3B4/4K3 w - - 0 1");
        assert!(pos.pinners(Color::White).is_empty());
        assert!(pos.blockers_for_king(Color::White).is_empty());
    }

    #[test]
    fn test_legal_king_cannot_retreat_along_ray() {
        // e1の玉がe8のルークに王手されている。e1->e2? いや後退方向:
        // 玉はルークの利きの延長線上（同じ筋の後方）へは逃げられない
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(pos.in_check());
        // e1->e2 は同じ筋で依然として利きの中
        assert!(!pos.legal(Move::new_move(sq("e1"), sq("e2"))));
        // e1->d1 は利きの外
        assert!(pos.legal(Move::new_move(sq("e1"), sq("d1"))));
    }

    #[test]
    fn test_ep_capture_discovered_check_is_illegal() {
        // 玉・両ポーン・ルークが同じ段に並ぶ局面。
        // アンパッサンは2マスが同時に空くため、ルークの横利きが
        // 玉に通ってしまい非合法になる
        let pos = Position::from_fen("8/8/8/8/k2pP2R/8/8/4K3 b - e3 0 1");
        assert_eq!(pos.ep_square(), Some(sq("e3")));
        assert!(!pos.legal(Move::new_en_passant(sq("d4"), sq("e3"))));
        // 通常の前進は合法
        assert!(pos.legal(Move::new_move(sq("d4"), sq("d3"))));
    }

    #[test]
    fn test_gives_check_discovered() {
        // 白: Rc1, Pc4 / 黒: Kc8, Pd5。c4のポーンはc筋の遮蔽駒
        let pos = Position::from_fen("2k5/8/8/3p4/2P5/8/8/2R1K3 w - - 0 1");
        assert!(pos.discovered_check_candidates().contains(sq("c4")));
        // 斜めに取ると直線から外れて開き王手
        assert!(pos.gives_check(Move::new_move(sq("c4"), sq("d5"))));
        // 直線に沿った前進は王手にならない
        assert!(!pos.gives_check(Move::new_move(sq("c4"), sq("c5"))));
    }

    #[test]
    fn test_do_null_move() {
        let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(pos.ep_square(), Some(sq("d6")));
        let key_before = pos.key();
        pos.do_null_move();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.ep_square(), None);
        assert_ne!(pos.key(), key_before);
        assert_eq!(pos.state().plies_from_null, 0);
    }

    #[test]
    fn test_is_draw_rule50_boundary() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 99 80");
        assert!(!pos.is_draw());
        pos.do_move(Move::new_move(sq("e1"), sq("d1")), false);
        assert_eq!(pos.rule50_count(), 100);
        assert!(pos.is_draw());
    }

    #[test]
    fn test_key_incremental_matches_recompute() {
        let mut pos = Position::from_fen(START_FEN);
        let moves = [
            Move::new_move(sq("e2"), sq("e4")),
            Move::new_move(sq("e7"), sq("e5")),
            Move::new_move(sq("g1"), sq("f3")),
            Move::new_move(sq("b8"), sq("c6")),
            Move::new_move(sq("f1"), sq("b5")),
        ];
        for m in moves {
            pos.do_move(m, pos.gives_check(m));
            assert_eq!(pos.key(), pos.compute_key());
        }
    }
}
