use crate::model::*;
use crate::util::misc::cartesian_product;

use super::win::{calc_possible_pairs, is_kokushimusou_win};

use SetPairType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPairType {
    Pair,    // 雀頭
    Shuntsu, // 順子
    Koutsu,  // 刻子
    Chi,     // チー
    Pon,     // ポン
    Minkan,  // 明槓 (大明槓 + 加槓)
    Ankan,   // 暗槓
}

// Tileは順子、チーの場合は先頭の牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPair(pub SetPairType, pub Tile);

pub type ParsedHand = Vec<SetPair>;

// 鳴きをSetPairに変換したリストを返却
pub fn parse_melds(melds: &[Meld]) -> ParsedHand {
    let mut res = vec![];

    for m in melds {
        let t = m.tiles[0];
        res.push(match m.meld_type {
            MeldType::Chi => SetPair(Chi, t),
            MeldType::Pon => SetPair(Pon, t),
            MeldType::Minkan | MeldType::Kakan => SetPair(Minkan, t),
            MeldType::Ankan => SetPair(Ankan, t),
        });
    }

    res
}

// 牌種を順子と刻子に分解
// 三連刻の場合2通り(刻子3つ, 順子3つ)の分割が存在する 四連刻は四暗刻の範囲なので無視
// 分解できない場合は空のリストを返却
// TileRowが空(すべて0)の場合は分解可能とみなし[[]]を返却
fn parse_row_into_sets(tr: &TileRow, ti: Type) -> Vec<ParsedHand> {
    let mut ph = vec![];
    let (mut n0, mut n1, mut n2);

    n0 = tr[1];
    n1 = tr[2];
    for i in 1..8 {
        n2 = tr[i + 2];

        // 刻子
        if n0 >= 3 {
            ph.push(SetPair(Koutsu, Tile(ti, i)));
        }

        // 順子 (字牌はn=0となる)
        let n = n0 % 3;
        if (ti == TZ && n != 0) || n1 < n || n2 < n {
            return vec![];
        }
        for _ in 0..n {
            ph.push(SetPair(Shuntsu, Tile(ti, i)))
        }
        n0 = n1 - n;
        n1 = n2 - n;
    }
    if n0 % 3 != 0 || n1 % 3 != 0 {
        return vec![];
    }
    if n0 == 3 {
        ph.push(SetPair(Koutsu, Tile(ti, 8)));
    }
    if n1 == 3 {
        ph.push(SetPair(Koutsu, Tile(ti, 9)));
    }

    if ti == TZ || ph.len() < 3 {
        return vec![ph];
    }

    // 三連刻チェック
    let (mut i, mut n) = (0, 0);
    for SetPair(tp, t) in &ph {
        if *tp == Koutsu {
            if i + n == t.1 {
                n += 1;
                if n == 3 {
                    break;
                }
            } else {
                i = t.1;
                n = 1;
            }
        }
    }

    // 三連刻なし
    if n != 3 {
        return vec![ph];
    }

    let mut ph2 = vec![];
    for &SetPair(tp, t) in &ph {
        if tp == Koutsu && i <= t.1 && t.1 < i + 3 {
            continue;
        }
        ph2.push(SetPair(tp, t));
    }
    let sp = SetPair(Shuntsu, Tile(ti, i));
    ph2.push(sp);
    ph2.push(sp);
    ph2.push(sp);

    vec![ph, ph2]
}

// 手牌が完成形(七対子・国士無双は除く)なら面子+雀頭に分解して返却
pub fn parse_into_normal_win(hand: &TileTable) -> Vec<ParsedHand> {
    let pairs = calc_possible_pairs(hand);
    if pairs.is_empty() {
        return vec![];
    }

    let mut phs_list = vec![];

    // 雀頭を含む列
    let pair_ti = pairs[0].0;
    let mut tr = hand[pair_ti];
    let mut phs = vec![];
    for pair in pairs {
        tr[pair.1] -= 2;
        let mut phs2 = parse_row_into_sets(&tr, pair_ti);
        tr[pair.1] += 2;
        for ph in &mut phs2 {
            ph.push(SetPair(Pair, pair));
        }
        phs.append(&mut phs2);
    }
    phs_list.push(phs);

    // 雀頭を含まない列
    for ti in 0..TYPE {
        if ti != pair_ti {
            phs_list.push(parse_row_into_sets(&hand[ti], ti));
        }
    }

    // それぞれの列の分割のすべての組み合わせ(直積)を求める
    let mut res = vec![];
    for v in cartesian_product(&phs_list) {
        let mut ph = vec![];
        for v2 in v {
            ph.extend(v2);
        }
        res.push(ph);
    }

    res
}

// 手牌が完成形(七対子)ならすべて対子に分解して返却
pub fn parse_into_chiitoitsu_win(hand: &TileTable) -> Vec<ParsedHand> {
    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            match hand[ti][ni] {
                0 => {}
                2 => res.push(SetPair(Pair, Tile(ti, ni))),
                _ => return vec![],
            }
        }
    }

    if res.len() == 7 {
        vec![res]
    } else {
        vec![] // 鳴き有り
    }
}

// 手牌が完成形(国士無双)なら空のParsedHandが入ったリストを返却
pub fn parse_into_kokushimusou_win(hand: &TileTable) -> Vec<ParsedHand> {
    if is_kokushimusou_win(hand) {
        vec![vec![]]
    } else {
        vec![]
    }
}

#[test]
fn test_parse_sanrenkou() {
    use crate::control::string::tiles_from_string;
    let tt = tiles_to_tile_table(&tiles_from_string("m111222333p789z11").unwrap());
    let phs = parse_into_normal_win(&tt);
    assert_eq!(phs.len(), 2);

    let n_koutsu = |ph: &ParsedHand| ph.iter().filter(|sp| sp.0 == Koutsu).count();
    let mut ns: Vec<usize> = phs.iter().map(n_koutsu).collect();
    ns.sort();
    assert_eq!(ns, vec![0, 3]);
    for ph in &phs {
        assert_eq!(ph.len(), 5);
        assert!(ph.contains(&SetPair(Pair, Tile(TZ, WE))));
    }
}

#[test]
fn test_parse_not_win() {
    use crate::control::string::tiles_from_string;
    let tt = tiles_to_tile_table(&tiles_from_string("m123456789p12z555").unwrap());
    assert!(parse_into_normal_win(&tt).is_empty());
    assert!(parse_into_chiitoitsu_win(&tt).is_empty());
    assert!(parse_into_kokushimusou_win(&tt).is_empty());

    let tt = tiles_to_tile_table(&tiles_from_string("m11223344556677").unwrap());
    assert_eq!(parse_into_chiitoitsu_win(&tt).len(), 1);
    assert!(!parse_into_normal_win(&tt).is_empty());
}

#[test]
fn test_parse_melds() {
    let melds = vec![
        Meld::new(MeldType::Chi, Tile(TS, 4), &[Tile(TS, 2), Tile(TS, 3)], House::W),
        Meld::new(MeldType::Kakan, Tile(TZ, DR), &[Tile(TZ, DR); 3], House::E),
    ];
    let ph = parse_melds(&melds);
    assert_eq!(ph, vec![SetPair(Chi, Tile(TS, 2)), SetPair(Minkan, Tile(TZ, DR))]);
}
