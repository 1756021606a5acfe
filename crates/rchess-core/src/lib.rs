//! # rchess-core
//!
//! チェスの盤面表現と指し手の合法性判定を提供するコアライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, Piece, Move, CastlingRights, etc.）
//! - `bitboard`: ビットボード演算と利きテーブル
//! - `position`: 局面表現、do_move、FEN、SEE、整合性検証
//!
//! 指し手生成や探索は扱わない。`Position`は値セマンティクスで、
//! 分岐して読みたい場合は`clone()`してから`do_move`する。

pub mod types;

pub mod bitboard;
pub mod position;
