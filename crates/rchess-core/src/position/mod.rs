//! 局面表現モジュール
//!
//! チェスの局面を表現し、指し手の実行と合法性判定を行う。
//!
//! - `Position`: 局面（分岐は`clone()`で行う値セマンティクス）
//! - `StateInfo`: 局面状態（ハッシュ、王手情報、キャスリング権等）
//! - FEN形式の解析・出力
//! - SEE（静的駒交換評価）と整合性検証

mod castling;
mod fen;
mod pos;
mod see;
mod state;
mod validate;
mod zobrist;

pub use fen::START_FEN;
pub use pos::Position;
pub use state::StateInfo;
pub use validate::ConsistencyError;
pub use zobrist::{zobrist_castling, zobrist_en_passant, zobrist_psq, zobrist_side, ZOBRIST};
