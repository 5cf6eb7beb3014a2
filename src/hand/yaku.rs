use std::fmt;

use crate::model::*;

use super::parse::{ParsedHand, SetPair, SetPairType};
use super::win::is_kokushimusou_win;

use SetPairType::*;

#[derive(Debug)]
pub struct YakuContext {
    hand: TileTable,         // 元々の手牌(鳴きは含まない, 和了牌を含む) 国士, 九蓮宝燈の判定などに使用
    parsed_hand: ParsedHand, // 鳴きを含むすべての面子
    pair_tile: Option<Tile>, // 雀頭の牌 (国士無双はNone)
    winning_tile: Tile,      // 上がり牌
    is_tsumo: bool,          // ツモ和了
    is_open: bool,           // 鳴きの有無 (暗槓は含まない)
    is_riichi: bool,         // リーチ宣言済み
    prevalent_wind: Tnum,    // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    seat_wind: Tnum,         // 自風 (同上)
    counts: Counts,          // 面子や牌種別のカウント
    iipeikou_count: usize,   // 一盃口, 二盃口用
    yakuhai_check: TileRow,  // 役牌面子のカウント(雀頭は含まない)
}

impl YakuContext {
    pub fn new(
        hand: TileTable,
        parsed_hand: ParsedHand,
        winning_tile: Tile,
        is_tsumo: bool,
        is_riichi: bool,
        prevalent_wind: Tnum,
        seat_wind: Tnum,
    ) -> Self {
        let pair_tile = get_pair(&parsed_hand);
        let counts = count_type(&parsed_hand, pair_tile, winning_tile, is_tsumo);
        let iipeikou_count = count_iipeikou(&parsed_hand);
        let yakuhai_check = check_yakuhai(&parsed_hand);
        let is_open = counts.chi + counts.pon + counts.minkan != 0;

        Self {
            hand,
            parsed_hand,
            pair_tile,
            winning_tile,
            is_tsumo,
            is_open,
            is_riichi,
            prevalent_wind,
            seat_wind,
            counts,
            iipeikou_count,
            yakuhai_check,
        }
    }

    // 成立した役の一覧と翻数の合計(ドラは含まない)を返却
    // 役満を含めて成立したものはすべて合算する
    pub fn calc_yaku(&self) -> (Vec<&'static Yaku>, usize) {
        let mut yaku = vec![];
        for y in YAKU_LIST {
            if (y.func)(self) {
                yaku.push(y)
            }
        }
        let fan = yaku.iter().map(|y| y.fan).sum();
        (yaku, fan)
    }
}

#[derive(Debug, Default)]
struct Counts {
    pair: usize,
    shuntsu: usize,
    koutsu: usize,
    chi: usize,
    pon: usize,
    minkan: usize,
    ankan: usize,
    shuntsu_total: usize, // shuntu + chi
    koutsu_total: usize,  // koutsu + pon + minkan + ankan
    ankou_total: usize,   // koutsu + ankan (ロンで完成した刻子を除く)
    kantsu_total: usize,  // minkan + ankan
    tis: [usize; TYPE],   // tile Type Indices counts
}

fn get_pair(ph: &ParsedHand) -> Option<Tile> {
    for &SetPair(tp, t) in ph {
        if tp == Pair {
            return Some(t);
        }
    }
    None // 雀頭なし(国士無双)
}

// 順子に牌tが含まれるか
fn shuntsu_contains(sp: &SetPair, t: &Tile) -> bool {
    sp.1 .0 == t.0 && sp.1 .1 <= t.1 && t.1 < sp.1 .1 + 3
}

fn count_type(ph: &ParsedHand, pair_tile: Option<Tile>, wt: Tile, is_tsumo: bool) -> Counts {
    let mut cnt = Counts::default();
    for SetPair(tp, t) in ph {
        match tp {
            Pair => cnt.pair += 1,
            Shuntsu => cnt.shuntsu += 1,
            Koutsu => cnt.koutsu += 1,
            Chi => cnt.chi += 1,
            Pon => cnt.pon += 1,
            Minkan => cnt.minkan += 1,
            Ankan => cnt.ankan += 1,
        }
        cnt.tis[t.0] += 1;
    }
    cnt.shuntsu_total = cnt.shuntsu + cnt.chi;
    cnt.koutsu_total = cnt.koutsu + cnt.pon + cnt.minkan + cnt.ankan;
    cnt.ankou_total = cnt.koutsu + cnt.ankan;
    cnt.kantsu_total = cnt.minkan + cnt.ankan;

    // ロン牌で完成した刻子は明刻扱い
    // ただし和了牌を雀頭または順子の一部とみなせる場合は暗刻のまま
    if !is_tsumo
        && ph.contains(&SetPair(Koutsu, wt))
        && pair_tile != Some(wt)
        && !ph
            .iter()
            .any(|sp| sp.0 == Shuntsu && shuntsu_contains(sp, &wt))
    {
        cnt.ankou_total -= 1;
    }

    cnt
}

fn count_iipeikou(ph: &ParsedHand) -> usize {
    let mut n = 0;
    let mut shuntsu = TileTable::default();
    for SetPair(tp, t) in ph {
        if *tp == Shuntsu {
            shuntsu[t.0][t.1] += 1;
            if shuntsu[t.0][t.1] == 2 {
                n += 1;
            }
        }
    }

    n
}

fn check_yakuhai(ph: &ParsedHand) -> TileRow {
    let mut tr = TileRow::default();
    for SetPair(tp, t) in ph {
        match tp {
            Koutsu | Pon | Minkan | Ankan => {
                if t.is_honor() {
                    tr[t.1] += 1;
                }
            }
            _ => {}
        }
    }

    tr
}

pub struct Yaku {
    pub name: &'static str,
    pub func: fn(&YakuContext) -> bool,
    pub fan: usize,
}

impl fmt::Debug for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.name, self.fan)
    }
}

macro_rules! yaku {
    ($n: expr, $f: expr, $c: expr) => {
        Yaku {
            name: $n,
            func: $f,
            fan: $c,
        }
    };
}

pub static YAKU_LIST: &[Yaku] = &[
    // 特殊条件
    yaku!("riichi", is_riichi, 1),
    yaku!("tsumo", is_menzentsumo, 1),
    // 役牌
    yaku!("field-wind", is_bakaze, 1),
    yaku!("seat-wind", is_jikaze, 1),
    yaku!("white", is_haku, 1),
    yaku!("green", is_hatsu, 1),
    yaku!("red", is_chun, 1),
    // 組み合わせ
    yaku!("tanyao", is_tanyaochuu, 1),
    yaku!("pinfu", is_pinfu, 1),
    yaku!("iipeko", is_iipeikou, 1),
    yaku!("ittsu", is_ikkitsuukan, 2),
    yaku!("sanshoku", is_sanshokudoujun, 2),
    yaku!("sanshoku-doko", is_sanshokudoukou, 2),
    yaku!("chanta", is_chanta, 2),
    yaku!("honroto", is_honroutou, 2),
    yaku!("toitoi", is_toitoihou, 2),
    yaku!("sananko", is_sanankou, 2),
    yaku!("sankantsu", is_sankantsu, 2),
    yaku!("shosangen", is_shousangen, 2),
    yaku!("chitoitsu", is_chiitoitsu, 2),
    yaku!("ryanpeko", is_ryanpeikou, 3),
    yaku!("junchan", is_junchan, 3),
    yaku!("honitsu", is_honiisou, 3),
    yaku!("chinitsu", is_chiniisou, 6),
    // 役満
    yaku!("kokushi", is_kokushimusou, 13),
    yaku!("suanko", is_suuankou, 13),
    yaku!("daisangen", is_daisangen, 13),
    yaku!("shosushi", is_shousuushii, 13),
    yaku!("daisushi", is_daisuushii, 13),
    yaku!("tsuiso", is_tuuiisou, 13),
    yaku!("ryuiso", is_ryuuiisou, 13),
    yaku!("chinroto", is_chinroutou, 13),
    yaku!("sukantsu", is_suukantsu, 13),
    yaku!("churen", is_chuurenpoutou, 13),
];

// 以下の役は排他的(包含関係)であり判定関数側で重複しないようにしている
//     一盃口, 二盃口
//     チャンタ, 純チャンタ
//     混老頭, 清老頭
//     混一色, 清一色
//     三暗刻, 四暗刻
//     三槓子, 四槓子
//     小四喜, 大四喜
// それ以外の重複(役満+対々和など)はそのまま合算

// リーチ
fn is_riichi(ctx: &YakuContext) -> bool {
    ctx.is_riichi
}

// 門前自摸
fn is_menzentsumo(ctx: &YakuContext) -> bool {
    ctx.is_tsumo && !ctx.is_open
}

// 場風
fn is_bakaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.prevalent_wind] == 1
}

// 自風
fn is_jikaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.seat_wind] == 1
}

// 白
fn is_haku(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DW] == 1
}

// 發
fn is_hatsu(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DG] == 1
}

// 中
fn is_chun(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DR] == 1
}

// 断么九
fn is_tanyaochuu(ctx: &YakuContext) -> bool {
    if ctx.parsed_hand.is_empty() {
        return false; // 国士対策
    }

    for SetPair(tp, t) in &ctx.parsed_hand {
        match tp {
            Chi | Shuntsu => {
                if t.1 == 1 || t.1 == 7 {
                    return false;
                }
            }
            _ => {
                if t.is_end() {
                    return false;
                }
            }
        }
    }

    true
}

// 平和
fn is_pinfu(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu != 4 || ctx.is_open {
        return false;
    }

    // 役牌の雀頭は不可
    if let Some(pt) = ctx.pair_tile {
        if pt.is_dragon() || (pt.is_wind() && (pt.1 == ctx.prevalent_wind || pt.1 == ctx.seat_wind)) {
            return false;
        }
    }

    // 上がり牌の両面待ち判定
    let wt = &ctx.winning_tile;
    if wt.is_honor() {
        return false;
    }
    for SetPair(tp, t) in &ctx.parsed_hand {
        if *tp == Shuntsu && t.0 == wt.0 {
            // 23待ちの1 or 4 (ただし12待ちの3, 89待ちの7は辺張)
            if (t.1 == wt.1 && wt.1 != 7) || (t.1 + 2 == wt.1 && wt.1 != 3) {
                return true;
            }
        }
    }

    false
}

// 一盃口
fn is_iipeikou(ctx: &YakuContext) -> bool {
    !ctx.is_open && ctx.iipeikou_count == 1
}

// 二盃口
fn is_ryanpeikou(ctx: &YakuContext) -> bool {
    !ctx.is_open && ctx.iipeikou_count == 2
}

// 一気通貫
fn is_ikkitsuukan(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }

    let mut f147 = [[false; 3]; 3];
    for SetPair(tp, t) in &ctx.parsed_hand {
        if let Shuntsu | Chi = tp {
            if let 1 | 4 | 7 = t.1 {
                f147[t.0][t.1 / 3] = true;
            }
        }
    }

    f147.iter().any(|f| f[0] && f[1] && f[2])
}

// 三色同順
fn is_sanshokudoujun(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }

    let mut mps = [[false; TNUM]; 3];
    for SetPair(tp, t) in &ctx.parsed_hand {
        if let Shuntsu | Chi = tp {
            mps[t.0][t.1] = true;
        }
    }

    (1..8).any(|ni| mps[TM][ni] && mps[TP][ni] && mps[TS][ni])
}

// 三色同刻
fn is_sanshokudoukou(ctx: &YakuContext) -> bool {
    if ctx.counts.koutsu_total < 3 {
        return false;
    }

    let mut mps = [[false; TNUM]; TYPE];
    for SetPair(tp, t) in &ctx.parsed_hand {
        if let Koutsu | Pon | Minkan | Ankan = tp {
            mps[t.0][t.1] = true;
        }
    }

    (1..TNUM).any(|ni| mps[TM][ni] && mps[TP][ni] && mps[TS][ni])
}

// チャンタ
fn is_chanta(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total == 0 {
        return false;
    }

    let mut has_honor = false;
    for SetPair(tp, t) in &ctx.parsed_hand {
        match tp {
            Pair | Koutsu | Pon | Minkan | Ankan => {
                if t.is_honor() {
                    has_honor = true;
                } else if !t.is_terminal() {
                    return false;
                }
            }
            Shuntsu | Chi => {
                if t.1 != 1 && t.1 != 7 {
                    return false;
                }
            }
        }
    }

    has_honor
}

// 純チャン
fn is_junchan(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total == 0 {
        return false;
    }

    for SetPair(tp, t) in &ctx.parsed_hand {
        match tp {
            Pair | Koutsu | Pon | Minkan | Ankan => {
                if !t.is_terminal() {
                    return false;
                }
            }
            Shuntsu | Chi => {
                if t.1 != 1 && t.1 != 7 {
                    return false;
                }
            }
        }
    }

    true
}

// 混老頭
fn is_honroutou(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total != 0 {
        return false;
    }

    let mut has_honor = false;
    let mut has_terminal = false;
    for SetPair(_, t) in &ctx.parsed_hand {
        if t.is_honor() {
            has_honor = true;
        } else if t.is_terminal() {
            has_terminal = true;
        } else {
            return false;
        }
    }

    has_honor && has_terminal
}

// 清老頭
fn is_chinroutou(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total != 0 {
        return false;
    }

    let mut has_terminal = false;
    for SetPair(_, t) in &ctx.parsed_hand {
        if t.is_terminal() {
            has_terminal = true;
        } else {
            return false;
        }
    }

    has_terminal
}

// 対々和
fn is_toitoihou(ctx: &YakuContext) -> bool {
    ctx.counts.koutsu_total == 4
}

// 三暗刻
fn is_sanankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 3
}

// 四暗刻 (単騎待ちのロンを含む)
fn is_suuankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 4
}

// 三槓子
fn is_sankantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 3
}

// 四槓子
fn is_suukantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 4
}

// 混一色
fn is_honiisou(ctx: &YakuContext) -> bool {
    use std::cmp::min;
    let tis = &ctx.counts.tis;
    let suit = min(tis[TM], 1) + min(tis[TP], 1) + min(tis[TS], 1);
    suit == 1 && tis[TZ] > 0
}

// 清一色
fn is_chiniisou(ctx: &YakuContext) -> bool {
    use std::cmp::min;
    let tis = &ctx.counts.tis;
    let suit = min(tis[TM], 1) + min(tis[TP], 1) + min(tis[TS], 1);
    suit == 1 && tis[TZ] == 0
}

// 小三元
fn is_shousangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 2 && ctx.pair_tile.map_or(false, |t| t.is_dragon())
}

// 大三元
fn is_daisangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 3
}

// 小四喜
fn is_shousuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 3 && ctx.pair_tile.map_or(false, |t| t.is_wind())
}

// 大四喜
fn is_daisuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 4
}

// 緑一色
fn is_ryuuiisou(ctx: &YakuContext) -> bool {
    if ctx.parsed_hand.is_empty() {
        return false;
    }

    for SetPair(tp, t) in &ctx.parsed_hand {
        if t.0 != TS && t.0 != TZ {
            return false;
        }
        match tp {
            Pair | Koutsu | Pon | Minkan | Ankan => {
                if t.is_honor() {
                    if t.1 != DG {
                        return false;
                    }
                } else {
                    match t.1 {
                        2 | 3 | 4 | 6 | 8 => {}
                        _ => return false,
                    }
                }
            }
            Shuntsu | Chi => {
                if t.1 != 2 {
                    // 順子は234以外は不可
                    return false;
                }
            }
        }
    }

    true
}

// 字一色
fn is_tuuiisou(ctx: &YakuContext) -> bool {
    (ctx.parsed_hand.len() == 5 && ctx.counts.tis[TZ] == 5) || ctx.counts.tis[TZ] == 7
}

// 九蓮宝燈 (純正を含む)
fn is_chuurenpoutou(ctx: &YakuContext) -> bool {
    if ctx.is_open || ctx.counts.ankan != 0 {
        return false;
    }

    let tis = &ctx.counts.tis;
    let ti = if tis[TM] == 5 {
        TM
    } else if tis[TP] == 5 {
        TP
    } else if tis[TS] == 5 {
        TS
    } else {
        return false;
    };

    let h = &ctx.hand;
    if h[ti][1] < 3 || h[ti][9] < 3 {
        return false;
    }
    for ni in 2..9 {
        if h[ti][ni] == 0 {
            return false;
        }
    }

    true
}

// 国士無双 (十三面待ちを含む)
fn is_kokushimusou(ctx: &YakuContext) -> bool {
    ctx.parsed_hand.is_empty() && is_kokushimusou_win(&ctx.hand)
}

// 七対子
fn is_chiitoitsu(ctx: &YakuContext) -> bool {
    ctx.counts.pair == 7
}

#[cfg(test)]
fn calc_yaku_names(hand: &str, melds: &[Meld], wt: &str, is_tsumo: bool) -> Vec<Vec<&'static str>> {
    use super::parse::*;
    use crate::control::string::tiles_from_string;

    let tt = tiles_to_tile_table(&tiles_from_string(hand).unwrap());
    let wt = Tile::from_symbol(wt).unwrap();
    let pm = parse_melds(melds);
    let mut res = vec![];
    let mut phs = parse_into_normal_win(&tt);
    phs.append(&mut parse_into_chiitoitsu_win(&tt));
    phs.append(&mut parse_into_kokushimusou_win(&tt));
    for mut ph in phs {
        ph.append(&mut pm.clone());
        let ctx = YakuContext::new(tt, ph, wt, is_tsumo, false, WE, WS);
        res.push(ctx.calc_yaku().0.iter().map(|y| y.name).collect());
    }
    res
}

#[test]
fn test_yaku_pinfu() {
    // 両面待ちのツモ
    let r = calc_yaku_names("m234678p345s23488", &[], "m4", true);
    assert_eq!(r, vec![vec!["tsumo", "tanyao", "pinfu"]]);

    // 辺張待ち(12の3)は平和にならない
    let r = calc_yaku_names("m123678p345s23499", &[], "m3", false);
    assert_eq!(r, vec![Vec::<&str>::new()]);
}

#[test]
fn test_yaku_yakuhai() {
    // 東場の南家: 東は場風, 南は自風
    let r = calc_yaku_names("m123p456s789z11122", &[], "z2", false);
    assert_eq!(r, vec![vec!["field-wind"]]);

    let melds = vec![Meld::new(MeldType::Pon, Tile(TZ, DR), &[Tile(TZ, DR); 2], House::N)];
    let r = calc_yaku_names("m123p456s789z22", &melds, "z2", false);
    assert_eq!(r, vec![vec!["red"]]);
}

#[test]
fn test_yaku_ron_koutsu() {
    // シャンポン待ちのロン: 和了牌の刻子は明刻扱い
    let r = calc_yaku_names("m111p999s55z111222", &[], "z2", false);
    assert_eq!(r.len(), 1);
    assert!(r[0].contains(&"toitoi"));
    assert!(r[0].contains(&"sananko"));
    assert!(!r[0].contains(&"suanko"));

    // 同じ形のツモは四暗刻
    let r = calc_yaku_names("m111p999s55z111222", &[], "z2", true);
    assert!(r[0].contains(&"suanko"));
    assert!(!r[0].contains(&"sananko"));

    // 単騎待ちならロンでも四暗刻
    let r = calc_yaku_names("m111p999s55z111222", &[], "s5", false);
    assert!(r[0].contains(&"suanko"));
}

#[test]
fn test_yaku_special() {
    let r = calc_yaku_names("m19p19s19z12345677", &[], "z7", false);
    assert_eq!(r, vec![vec!["kokushi"]]);

    let r = calc_yaku_names("m11223344556677", &[], "m7", true);
    assert_eq!(r.len(), 4); // 七対子 + 二盃口形の分解3通り
    assert!(r.contains(&vec!["tsumo", "chitoitsu", "chinitsu"]));
    assert!(r.contains(&vec!["tsumo", "ryanpeko", "chinitsu"]));

    let r = calc_yaku_names("m11123455678999", &[], "m5", false);
    assert!(r.iter().all(|v| v.contains(&"churen") && v.contains(&"chinitsu")));
}
