//! Zobristハッシュ

use crate::types::{File, Piece, Square};

/// Zobristハッシュ用乱数テーブル
pub struct Zobrist {
    /// 手番用（黒番のときXORする）
    pub side: u64,
    /// 駒×升 [Piece.index()][Square.index()]
    pub psq: [[u64; Square::NUM]; Piece::NUM],
    /// キャスリング権（4bitマスクの全組み合わせ）
    pub castling: [u64; 16],
    /// アンパッサン対象ファイル [File]
    pub en_passant: [u64; File::NUM],
}

impl Zobrist {
    /// テーブル初期化
    pub const fn init() -> Self {
        let mut zobrist = Zobrist {
            side: 0,
            psq: [[0; Square::NUM]; Piece::NUM],
            castling: [0; 16],
            en_passant: [0; File::NUM],
        };

        // XorShift64で疑似乱数生成
        let mut seed = 0x123456789ABCDEF0u64;

        // 手番用
        seed = xorshift64(seed);
        zobrist.side = seed;

        // 駒×升
        // pc == 0 (Piece::NONE) は常に0を保つためスキップ
        let mut pc = 1;
        while pc < Piece::NUM {
            let mut sq = 0;
            while sq < Square::NUM {
                seed = xorshift64(seed);
                zobrist.psq[pc][sq] = seed;
                sq += 1;
            }
            pc += 1;
        }

        // キャスリング権（cr == 0 は0を保つ）
        let mut cr = 1;
        while cr < 16 {
            seed = xorshift64(seed);
            zobrist.castling[cr] = seed;
            cr += 1;
        }

        // アンパッサン（ファイルのみで区別する）
        let mut f = 0;
        while f < File::NUM {
            seed = xorshift64(seed);
            zobrist.en_passant[f] = seed;
            f += 1;
        }

        zobrist
    }
}

/// XorShift64疑似乱数生成（const fn対応）
const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// グローバルZobristテーブル
pub static ZOBRIST: Zobrist = Zobrist::init();

/// 駒と升のハッシュを取得
#[inline]
pub fn zobrist_psq(pc: Piece, sq: Square) -> u64 {
    ZOBRIST.psq[pc.index()][sq.index()]
}

/// 手番のハッシュを取得
#[inline]
pub fn zobrist_side() -> u64 {
    ZOBRIST.side
}

/// キャスリング権マスクのハッシュを取得
#[inline]
pub fn zobrist_castling(mask: u8) -> u64 {
    ZOBRIST.castling[mask as usize]
}

/// アンパッサン対象マスのハッシュを取得
#[inline]
pub fn zobrist_en_passant(sq: Square) -> u64 {
    ZOBRIST.en_passant[sq.file().index()]
}
