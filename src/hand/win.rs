use crate::model::*;

// [面子分解]

// 牌種ごとの枚数
fn row_count(tr: &TileRow) -> usize {
    tr[1..TNUM].iter().sum()
}

// 刻子と順子のみで構成されているか
// 左端の牌から見て3枚に満たない余りは順子の先頭でなければならない
fn is_sets(tr: &TileRow, ti: Type) -> bool {
    let mut r = *tr;
    for ni in 1..TNUM {
        let n = r[ni] % 3;
        if n == 0 {
            continue;
        }
        if ti == TZ || ni + 2 >= TNUM || r[ni + 1] < n || r[ni + 2] < n {
            return false;
        }
        r[ni + 1] -= n;
        r[ni + 2] -= n;
    }
    true
}

// 面子+雀頭で構成されている牌種について雀頭になりうる牌
// 通常は1つ, 3113や3111113のような形では2つ
fn row_pairs(tr: &TileRow, ti: Type) -> Vec<Tile> {
    let mut r = *tr;
    let mut res = vec![];
    for ni in 1..TNUM {
        if r[ni] < 2 {
            continue;
        }
        r[ni] -= 2;
        if is_sets(&r, ti) {
            res.push(Tile(ti, ni));
        }
        r[ni] += 2;
    }
    res
}

// 14 - (副露数) * 3 枚の手牌が通常形の和了形である場合,雀頭候補のリストを返却
// 雀頭を含む牌種は枚数を3で割った余りが2の1種類のみ
pub fn calc_possible_pairs(hand: &TileTable) -> Vec<Tile> {
    let mut pair_ti = None;
    for ti in 0..TYPE {
        match row_count(&hand[ti]) % 3 {
            0 => {
                if !is_sets(&hand[ti], ti) {
                    return vec![];
                }
            }
            2 if pair_ti.is_none() => pair_ti = Some(ti),
            _ => return vec![],
        }
    }

    match pair_ti {
        Some(ti) => row_pairs(&hand[ti], ti),
        None => vec![],
    }
}

// [和了形判定]

// 通常形
pub fn is_normal_win(hand: &TileTable) -> bool {
    !calc_possible_pairs(hand).is_empty()
}

// 七対子 (同じ牌4枚は2対子とみなさない)
pub fn is_chiitoitsu_win(hand: &TileTable) -> bool {
    let mut n_pair = 0;
    for t in Tile::all() {
        match hand[t.0][t.1] {
            0 => {}
            2 => n_pair += 1,
            _ => return false,
        }
    }
    n_pair == 7
}

// 国士無双
pub fn is_kokushimusou_win(hand: &TileTable) -> bool {
    let total: usize = hand.iter().map(row_count).sum();
    let mut n_end = 0;
    for t in Tile::all().filter(|t| t.is_end()) {
        let n = hand[t.0][t.1];
        if n == 0 {
            return false;
        }
        n_end += n;
    }
    n_end == 14 && total == 14
}

pub fn is_win(hand: &TileTable) -> bool {
    is_normal_win(hand) || is_chiitoitsu_win(hand) || is_kokushimusou_win(hand)
}

// [待ち]

// 1枚加えると和了形になる牌の一覧 (ソート済み)
// 聴牌していない場合は空
pub fn calc_tiles_to_win(hand: &TileTable) -> Vec<Tile> {
    let mut hand = *hand;
    let mut res = vec![];
    for t in Tile::all() {
        hand[t.0][t.1] += 1;
        if is_win(&hand) {
            res.push(t);
        }
        hand[t.0][t.1] -= 1;
    }
    res
}

// ツモ番において聴牌となる打牌と待ちの組み合わせの一覧
// リーチ宣言が可能かどうかの確認に使用
pub fn calc_discards_to_tenpai(hand: &TileTable) -> Vec<(Tile, Vec<Tile>)> {
    let mut hand = *hand;
    let mut res = vec![];
    for t in Tile::all() {
        if hand[t.0][t.1] == 0 {
            continue;
        }
        hand[t.0][t.1] -= 1;
        let waits = calc_tiles_to_win(&hand);
        if !waits.is_empty() {
            res.push((t, waits));
        }
        hand[t.0][t.1] += 1;
    }
    res
}

#[test]
fn test_is_sets() {
    let row = |s: &str| {
        let mut tr = TileRow::default();
        for c in s.chars() {
            tr[c as usize - '0' as usize] += 1;
        }
        tr
    };
    assert!(is_sets(&row("111222333"), TM));
    assert!(is_sets(&row("123345567"), TP));
    assert!(!is_sets(&row("1235"), TS));
    assert!(!is_sets(&row("123"), TZ));
    assert!(is_sets(&row("555"), TZ));
    assert_eq!(row_pairs(&row("11123"), TM), vec![Tile(TM, 1)]);
    assert_eq!(row_pairs(&row("1113"), TM), vec![]);
    assert_eq!(row_pairs(&row("11123444"), TS), vec![Tile(TS, 1), Tile(TS, 4)]);
}

#[test]
fn test_is_win() {
    use crate::control::string::tiles_from_string;
    let win = |s: &str| is_win(&tiles_to_tile_table(&tiles_from_string(s).unwrap()));

    assert!(win("m123456789p11z555"));
    assert!(win("m11223344556677")); // 七対子 (二盃口形でもある)
    assert!(win("p1199s1199z112233"));
    assert!(win("m19p19s19z12345677")); // 国士無双
    assert!(win("m111p22")); // 副露3つ
    assert!(!win("m123456789p12z555"));
    assert!(!win("m1122334455667z1"));
    assert!(!win("m1111p22s22z223344")); // 4枚使いの七対子
}

#[test]
fn test_tiles_to_win() {
    use crate::control::string::tiles_from_string;
    let waits = |s: &str| {
        let tt = tiles_to_tile_table(&tiles_from_string(s).unwrap());
        calc_tiles_to_win(&tt)
    };

    assert_eq!(waits("m1112345678999"), tiles_from_string("m123456789").unwrap()); // 九蓮宝燈
    assert_eq!(waits("m23p456s789z11122"), tiles_from_string("m14").unwrap());
    assert_eq!(waits("m1122334455667"), tiles_from_string("m147").unwrap());
    assert_eq!(waits("m19p19s19z1234567").len(), 13);
    assert_eq!(waits("m19p19s19z1234566"), tiles_from_string("z7").unwrap());
    assert!(waits("m13579p2468s1357").is_empty());
}

#[test]
fn test_discards_to_tenpai() {
    use crate::control::string::tiles_from_string;
    let tt = tiles_to_tile_table(&tiles_from_string("m123456789p1z1235").unwrap());
    let res = calc_discards_to_tenpai(&tt);
    assert!(res.is_empty());

    let tt = tiles_to_tile_table(&tiles_from_string("m123456789p11z115").unwrap());
    let res = calc_discards_to_tenpai(&tt);
    let (_, waits) = res.iter().find(|(t, _)| *t == Tile(TZ, 5)).unwrap();
    assert_eq!(waits, &tiles_from_string("p1z1").unwrap()); // シャンポン待ち
    assert!(res.iter().all(|(t, _)| *t != Tile(TZ, 1)));
}
