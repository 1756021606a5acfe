//! ビットボードモジュール
//!
//! 64マスの盤面をu64で表現し、高速なビット演算を提供する。
//!
//! - `Bitboard`: 64bit盤面表現
//! - 近接駒の利きテーブル
//! - 遠方駒の利き計算

mod core;
mod sliders;
mod tables;

pub use core::{file_bb, rank_bb, Bitboard, BitboardIter};
pub use sliders::*;
pub use tables::*;
