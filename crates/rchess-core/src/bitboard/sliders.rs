//! 遠方駒（ビショップ、ルーク、クイーン）の利き計算

use std::array;
use std::sync::OnceLock;

use crate::types::{File, Rank, Square};

use super::Bitboard;

struct SliderTable {
    rook_masks: [Vec<Square>; Square::NUM],
    rook_attacks: [Vec<Bitboard>; Square::NUM],
    bishop_masks: [Vec<Square>; Square::NUM],
    bishop_attacks: [Vec<Bitboard>; Square::NUM],
}

static SLIDER_ATTACKS: OnceLock<SliderTable> = OnceLock::new();

fn slider_attacks() -> &'static SliderTable {
    SLIDER_ATTACKS.get_or_init(SliderTable::new)
}

impl SliderTable {
    fn new() -> Self {
        let mut rook_masks: [Vec<Square>; Square::NUM] = array::from_fn(|_| Vec::new());
        let mut rook_attacks: [Vec<Bitboard>; Square::NUM] = array::from_fn(|_| Vec::new());
        let mut bishop_masks: [Vec<Square>; Square::NUM] = array::from_fn(|_| Vec::new());
        let mut bishop_attacks: [Vec<Bitboard>; Square::NUM] = array::from_fn(|_| Vec::new());

        for sq in Square::all() {
            let idx = sq.index();

            let rook_rays = build_rays(sq, &[(0, -1), (0, 1), (1, 0), (-1, 0)]);
            let rook_mask = flatten_rays(&rook_rays);
            rook_masks[idx] = rook_mask.clone();
            rook_attacks[idx] = build_attack_table(&rook_rays, &rook_mask);

            let bishop_rays = build_rays(sq, &[(1, -1), (-1, -1), (1, 1), (-1, 1)]);
            let bishop_mask = flatten_rays(&bishop_rays);
            bishop_masks[idx] = bishop_mask.clone();
            bishop_attacks[idx] = build_attack_table(&bishop_rays, &bishop_mask);
        }

        SliderTable {
            rook_masks,
            rook_attacks,
            bishop_masks,
            bishop_attacks,
        }
    }
}

fn build_rays(sq: Square, dirs: &[(i32, i32)]) -> Vec<Vec<Square>> {
    dirs.iter().map(|&(df, dr)| ray(sq, df, dr)).collect()
}

fn ray(sq: Square, df: i32, dr: i32) -> Vec<Square> {
    let mut squares = Vec::new();
    let mut file = sq.file() as i32 + df;
    let mut rank = sq.rank() as i32 + dr;
    while in_bounds(file, rank) {
        squares.push(square_at(file, rank));
        file += df;
        rank += dr;
    }
    squares
}

fn flatten_rays(rays: &[Vec<Square>]) -> Vec<Square> {
    rays.iter().flat_map(|v| v.iter().copied()).collect()
}

fn build_attack_table(rays: &[Vec<Square>], mask: &[Square]) -> Vec<Bitboard> {
    debug_assert!(mask.len() < usize::BITS as usize);
    let table_len = 1usize << mask.len();
    let mut table = Vec::with_capacity(table_len);
    for idx in 0..table_len {
        let occupied = occupancy_from_index(idx, mask);
        let attacks = attacks_from_rays(rays, occupied);
        table.push(attacks);
    }
    table
}

fn occupancy_from_index(index: usize, mask: &[Square]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for (i, sq) in mask.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            bb.set(*sq);
        }
    }
    bb
}

fn occupancy_to_index(occupied: Bitboard, mask: &[Square]) -> usize {
    let mut idx = 0usize;
    for (i, sq) in mask.iter().enumerate() {
        if occupied.contains(*sq) {
            idx |= 1usize << i;
        }
    }
    idx
}

fn attacks_from_rays(rays: &[Vec<Square>], occupied: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for ray in rays {
        for &target in ray {
            result.set(target);
            if occupied.contains(target) {
                break;
            }
        }
    }
    result
}

#[inline]
fn in_bounds(file: i32, rank: i32) -> bool {
    (0..=7).contains(&file) && (0..=7).contains(&rank)
}

#[inline]
fn square_at(file: i32, rank: i32) -> Square {
    Square::new(
        File::from_u8(file as u8).unwrap_or(File::FileA),
        Rank::from_u8(rank as u8).unwrap_or(Rank::Rank1),
    )
}

/// ビショップの利きを計算
///
/// # Arguments
/// * `sq` - 駒の位置
/// * `occupied` - 盤上の駒があるマスのBitboard
#[inline]
pub fn bishop_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let table = slider_attacks();
    let mask = &table.bishop_masks[sq.index()];
    let idx = occupancy_to_index(occupied, mask);
    table.bishop_attacks[sq.index()][idx]
}

/// ルークの利きを計算
#[inline]
pub fn rook_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let table = slider_attacks();
    let mask = &table.rook_masks[sq.index()];
    let idx = occupancy_to_index(occupied, mask);
    table.rook_attacks[sq.index()][idx]
}

/// クイーンの利きを計算（ビショップの利き + ルークの利き）
#[inline]
pub fn queen_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_effect(sq, occupied) | rook_effect(sq, occupied)
}

/// 2マス間のBitboard（両端を含まない）
pub fn between_bb(sq1: Square, sq2: Square) -> Bitboard {
    let file1 = sq1.file() as i32;
    let rank1 = sq1.rank() as i32;
    let file2 = sq2.file() as i32;
    let rank2 = sq2.rank() as i32;

    if sq1 == sq2 {
        return Bitboard::EMPTY;
    }

    let file_diff = file2 - file1;
    let rank_diff = rank2 - rank1;

    // 同一直線上にない場合は空
    if file_diff != 0 && rank_diff != 0 && file_diff.abs() != rank_diff.abs() {
        return Bitboard::EMPTY;
    }

    let file_step = file_diff.signum();
    let rank_step = rank_diff.signum();

    let mut result = Bitboard::EMPTY;
    let mut f = file1 + file_step;
    let mut r = rank1 + rank_step;

    while f != file2 || r != rank2 {
        result.set(square_at(f, r));
        f += file_step;
        r += rank_step;
    }

    result
}

/// 2マスを通る直線全体のBitboard（両端を含む）
///
/// 同一直線上にない場合は空を返す。
pub fn line_bb(sq1: Square, sq2: Square) -> Bitboard {
    let file1 = sq1.file() as i32;
    let rank1 = sq1.rank() as i32;
    let file2 = sq2.file() as i32;
    let rank2 = sq2.rank() as i32;

    if sq1 == sq2 {
        return Bitboard::EMPTY;
    }

    let file_diff = file2 - file1;
    let rank_diff = rank2 - rank1;

    // 同一直線上にない場合は空
    if file_diff != 0 && rank_diff != 0 && file_diff.abs() != rank_diff.abs() {
        return Bitboard::EMPTY;
    }

    // 同じ筋
    if file_diff == 0 {
        return super::file_bb(sq1.file());
    }

    // 同じ段
    if rank_diff == 0 {
        return super::rank_bb(sq1.rank());
    }

    // 斜め
    let file_step = file_diff.signum();
    let rank_step = rank_diff.signum();

    let mut result = Bitboard::EMPTY;

    // sq1から逆方向に伸ばす
    let mut f = file1;
    let mut r = rank1;
    while in_bounds(f, r) {
        result.set(square_at(f, r));
        f -= file_step;
        r -= rank_step;
    }

    // sq1から順方向に伸ばす
    f = file1 + file_step;
    r = rank1 + rank_step;
    while in_bounds(f, r) {
        result.set(square_at(f, r));
        f += file_step;
        r += rank_step;
    }

    result
}

/// 3マスが同一直線上にあるか
#[inline]
pub fn aligned(sq1: Square, sq2: Square, sq3: Square) -> bool {
    line_bb(sq1, sq2).contains(sq3)
}
