use crate::model::*;

use super::parse::*;
use super::yaku::*;

#[derive(Debug)]
pub struct WinContext {
    pub yaku: Vec<&'static Yaku>, // 役一覧(ドラは含まない)
    pub n_dora: usize,            // ドラの数
    pub fan: usize,               // 翻数(ドラを含む)
}

impl WinContext {
    // 役のみの翻数
    pub fn yaku_fan(&self) -> usize {
        self.fan - self.n_dora
    }
}

// 和了形である場合、最も翻数が高くなる役の組み合わせのSome(WinContext)を返却
// 和了形でない場合、Noneを返却
// 和了形でも無役の場合はyaku: []となる (ドラのみの翻数)
#[allow(clippy::too_many_arguments)]
pub fn evaluate_hand(
    hand: &TileTable,     // 手牌(鳴き以外, 和了牌を含む)
    melds: &[Meld],       // 鳴き
    doras: &[Tile],       // ドラ表示牌 (注:ドラそのものではない)
    winning_tile: Tile,   // 上がり牌
    is_tsumo: bool,       // ツモ和了
    is_riichi: bool,      // リーチ宣言済み
    prevalent_wind: Tnum, // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    seat_wind: Tnum,      // 自風 (同上)
) -> Option<WinContext> {
    let mut phs = vec![];

    // 和了(通常)
    let pm = parse_melds(melds);
    for mut ph in parse_into_normal_win(hand).into_iter() {
        ph.append(&mut pm.clone());
        phs.push(ph);
    }

    // 和了(七対子, 国士無双) 副露がある場合は成立しない
    if melds.is_empty() {
        phs.append(&mut parse_into_chiitoitsu_win(hand));
        phs.append(&mut parse_into_kokushimusou_win(hand));
    }

    if phs.is_empty() {
        return None; // 和了形以外
    }

    // ロン和了の場合, 和了牌は他家の捨て牌なのでドラとして数えない
    let n_dora = if is_tsumo {
        count_dora(hand, melds, doras)
    } else {
        let mut revealed = *hand;
        revealed[winning_tile.0][winning_tile.1] =
            revealed[winning_tile.0][winning_tile.1].saturating_sub(1);
        count_dora(&revealed, melds, doras)
    };

    let mut results = vec![];
    for ph in phs {
        let ctx = YakuContext::new(
            *hand,
            ph,
            winning_tile,
            is_tsumo,
            is_riichi,
            prevalent_wind,
            seat_wind,
        );
        let (yaku, fan) = ctx.calc_yaku();
        results.push(WinContext {
            yaku,
            n_dora,
            fan: fan + n_dora,
        });
    }

    results.sort_by_key(|r| r.fan);
    results.pop()
}

// ドラ表示牌のリストを受け取ってドラ評価値のテーブルを返却
// 同じ表示牌が複数ある場合はそれぞれ数える
pub fn create_dora_table(doras: &[Tile]) -> TileTable {
    let mut dt = TileTable::default();
    for d in doras {
        let t = d.next_dora();
        dt[t.0][t.1] += 1;
    }

    dt
}

// ドラの数を勘定 (手牌 + 鳴き)
pub fn count_dora(hand: &TileTable, melds: &[Meld], doras: &[Tile]) -> usize {
    let dt = create_dora_table(doras);
    let mut n_dora = 0;

    for ti in 0..TYPE {
        for ni in 1..TNUM {
            n_dora += dt[ti][ni] * hand[ti][ni];
        }
    }

    for m in melds {
        for t in &m.tiles {
            n_dora += dt[t.0][t.1];
        }
    }

    n_dora
}

#[test]
fn test_count_dora() {
    use crate::control::string::tiles_from_string;
    let tt = tiles_to_tile_table(&tiles_from_string("m123p456s789z11").unwrap());

    // 表示牌m1 -> ドラm2
    assert_eq!(count_dora(&tt, &[], &[Tile(TM, 1)]), 1);
    // 表示牌z4 -> ドラz1 (2枚)
    assert_eq!(count_dora(&tt, &[], &[Tile(TZ, WN)]), 2);
    // 表示牌s9 -> ドラs1 (0枚)
    assert_eq!(count_dora(&tt, &[], &[Tile(TS, 9)]), 0);

    let melds = vec![Meld::new(MeldType::Pon, Tile(TZ, DW), &[Tile(TZ, DW); 2], House::S)];
    assert_eq!(count_dora(&tt, &melds, &[Tile(TZ, DR), Tile(TM, 1)]), 4);
}

#[test]
fn test_evaluate_hand() {
    use crate::control::string::tiles_from_string;
    let tt = tiles_to_tile_table(&tiles_from_string("m11223344556677").unwrap());

    // 七対子(2)より二盃口(3)+平和(1)を優先
    let ctx = evaluate_hand(&tt, &[], &[], Tile(TM, 1), false, true, WE, WS).unwrap();
    let names: Vec<&str> = ctx.yaku.iter().map(|y| y.name).collect();
    assert_eq!(names, vec!["riichi", "pinfu", "ryanpeko", "chinitsu"]);
    assert_eq!(ctx.fan, 11);
    assert_eq!(ctx.yaku_fan(), 11);

    // 和了形以外
    let tt = tiles_to_tile_table(&tiles_from_string("m1122334455667z1").unwrap());
    assert!(evaluate_hand(&tt, &[], &[], Tile(TZ, 1), false, false, WE, WS).is_none());

    // 無役 (ドラのみ)
    let tt = tiles_to_tile_table(&tiles_from_string("m123678p345s23499").unwrap());
    let ctx = evaluate_hand(&tt, &[], &[Tile(TS, 8)], Tile(TM, 3), false, false, WE, WS).unwrap();
    assert!(ctx.yaku.is_empty());
    assert_eq!(ctx.fan, 2);

    // ロン牌はドラに含めない (表示牌s3 -> ドラs4)
    let tt = tiles_to_tile_table(&tiles_from_string("m234567p234s23488").unwrap());
    let ron = evaluate_hand(&tt, &[], &[Tile(TS, 3)], Tile(TS, 4), false, false, WE, WS).unwrap();
    assert_eq!(ron.n_dora, 0);
    assert_eq!(ron.fan, 4);
    let tsumo = evaluate_hand(&tt, &[], &[Tile(TS, 3)], Tile(TS, 4), true, false, WE, WS).unwrap();
    assert_eq!(tsumo.n_dora, 1);
    assert_eq!(tsumo.fan, 6);
}
