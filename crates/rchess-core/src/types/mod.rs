//! 基本型の定義
//!
//! 盤面座標（File / Rank / Square）、駒（PieceType / Piece）、
//! 手番（Color）、指し手（Move）、キャスリング権（CastlingRights）を提供する。

mod castling;
mod color;
mod file;
mod moves;
mod piece;
mod piece_type;
mod rank;
mod square;

pub use castling::{CastlingRight, CastlingRights, CastlingSide};
pub use color::Color;
pub use file::File;
pub use moves::{Move, MoveKind};
pub use piece::Piece;
pub use piece_type::PieceType;
pub use rank::Rank;
pub use square::Square;
