use crate::errors::{ReplicaError, ReplicaResult};
use crate::hand::*;
use crate::listener::Listener;
use crate::model::*;

use crate::{debug, warn};

// [PlayerEngine]
// 1人のプレイヤー視点の局のレプリカ
// 権威側で確定したイベントを順に適用し, 他家の手牌は枚数のみ保持する
#[derive(Debug)]
pub struct PlayerEngine {
    pub(super) me: House,
    pub(super) rule: Rule,
    pub(super) state: RoundState,
    pub(super) listeners: Vec<Box<dyn Listener>>,
    pub(super) desynced: bool,
}

impl PlayerEngine {
    pub fn new(
        my_user: Seat,
        init: RoundInit,
        rule: Rule,
        listeners: Vec<Box<dyn Listener>>,
    ) -> ReplicaResult<Self> {
        if my_user >= SEAT {
            return Err(snapshot_error(format!("invalid user index: {}", my_user)));
        }
        for h in House::ALL {
            if !init.user_houses.contains(&h) {
                return Err(snapshot_error(format!("house {} is not seated", h)));
            }
        }
        let me = init.user_houses[my_user];
        if init.hand_tiles.len() != init.hand_counts[me] {
            return Err(snapshot_error(format!(
                "hand size mismatch: {} tiles, count {}",
                init.hand_tiles.len(),
                init.hand_counts[me]
            )));
        }

        Ok(Self {
            me,
            rule,
            state: RoundState::new(me, init),
            listeners,
            desynced: false,
        })
    }

    // イベントを1件適用
    // 和了イベントの場合は和了結果を返却
    // 前提条件を満たさないイベントはDesyncとなり, 以降のイベントはすべて拒否する
    pub fn handle_event(&mut self, event: &Event) -> ReplicaResult<Option<WinResult>> {
        if self.desynced {
            return Err(ReplicaError::desync(
                event.name(),
                "replica is desynced, rebuild it from a snapshot",
            ));
        }

        let me = self.me;
        let rule = &self.rule;
        let stg = &mut self.state;
        let res = match event {
            Event::Deal(e) => event_deal(stg, me, e).map(|_| None),
            Event::Discard(e) => event_discard(stg, me, rule, e).map(|_| None),
            Event::Pon(e) => event_pon(stg, e).map(|_| None),
            Event::Chi(e) => event_chi(stg, e).map(|_| None),
            Event::Minkan(e) => event_minkan(stg, e).map(|_| None),
            Event::Ankan(e) => event_ankan(stg, e).map(|_| None),
            Event::Kakan(e) => event_kakan(stg, e).map(|_| None),
            Event::Dora(e) => event_dora(stg, e).map(|_| None),
            Event::TsumoWin(e) => event_tsumo_win(stg, e).map(|r| Some(WinResult::Tsumo(r))),
            Event::RonWin(e) => event_ron_win(stg, e).map(|r| Some(WinResult::Ron(r))),
            Event::Nop(e) => event_nop(stg, e).map(|_| None),
        };

        match &res {
            Ok(r) => {
                debug!("[{}] {:?}", me, event);
                for l in &mut self.listeners {
                    l.notify_event(stg, event);
                }
                if let Some(r) = r {
                    for l in &mut self.listeners {
                        l.notify_result(stg, r);
                    }
                }
            }
            Err(err) => {
                warn!("[{}] {:?}: {}", me, event, err);
                if err.is_desync() {
                    self.desynced = true;
                    for l in &mut self.listeners {
                        l.notify_desync(stg, event, err);
                    }
                }
            }
        }

        res
    }

    pub fn commit_deal(&mut self, house: House, tile: Option<Tile>) -> ReplicaResult<()> {
        self.handle_event(&Event::deal(house, tile)).map(|_| ())
    }

    pub fn commit_discard(&mut self, house: House, tile: Tile, riichi: bool) -> ReplicaResult<()> {
        self.handle_event(&Event::discard(house, tile, riichi))
            .map(|_| ())
    }

    pub fn commit_pon(&mut self, caller: House, callee: House) -> ReplicaResult<()> {
        self.handle_event(&Event::pon(caller, callee)).map(|_| ())
    }

    pub fn commit_chi(
        &mut self,
        caller: House,
        callee: House,
        consumed: [Tile; 2],
    ) -> ReplicaResult<()> {
        self.handle_event(&Event::chi(caller, callee, consumed))
            .map(|_| ())
    }

    pub fn commit_minkan(&mut self, caller: House, callee: House) -> ReplicaResult<()> {
        self.handle_event(&Event::minkan(caller, callee)).map(|_| ())
    }

    pub fn commit_ankan(&mut self, house: House, tile: Tile) -> ReplicaResult<()> {
        self.handle_event(&Event::ankan(house, tile)).map(|_| ())
    }

    pub fn commit_kakan(&mut self, house: House, tile: Tile) -> ReplicaResult<()> {
        self.handle_event(&Event::kakan(house, tile)).map(|_| ())
    }

    pub fn commit_dora(&mut self, tile: Tile) -> ReplicaResult<()> {
        self.handle_event(&Event::dora(tile)).map(|_| ())
    }

    pub fn commit_tsumo_win(
        &mut self,
        house: House,
        hand_tiles: Vec<Tile>,
        tsumo_tile: Tile,
    ) -> ReplicaResult<KyokuResult> {
        match self.handle_event(&Event::tsumo_win(house, hand_tiles, tsumo_tile))? {
            Some(WinResult::Tsumo(r)) => Ok(r),
            _ => Err(ReplicaError::invalid_win(house, "no tsumo result")),
        }
    }

    pub fn commit_ron_win(
        &mut self,
        callers: Vec<House>,
        callee: House,
        hand_tiles: Houses<Vec<Tile>>,
    ) -> ReplicaResult<Houses<Option<KyokuResult>>> {
        match self.handle_event(&Event::ron_win(callers, callee, hand_tiles))? {
            Some(WinResult::Ron(rs)) => Ok(rs),
            _ => Err(ReplicaError::invalid_win(callee, "no ron result")),
        }
    }

    pub fn commit_nop(&mut self) -> ReplicaResult<()> {
        self.handle_event(&Event::nop()).map(|_| ())
    }
}

fn snapshot_error(message: String) -> ReplicaError {
    ReplicaError::Snapshot { message }
}

fn desync<T>(event: &str, message: String) -> ReplicaResult<T> {
    Err(ReplicaError::desync(event, message))
}

fn check_turn(stg: &RoundState, event: &str, house: House) -> ReplicaResult<()> {
    if stg.turn != Some(house) {
        return desync(event, format!("turn is {:?}, not {}", stg.turn, house));
    }
    Ok(())
}

// 鳴きの対象となる直前の打牌を返却
fn check_pending(stg: &RoundState, event: &str, caller: House, callee: House) -> ReplicaResult<Tile> {
    if caller == callee {
        return desync(event, format!("{} called own discard", caller));
    }
    match stg.last_discard() {
        Some((h, t)) if h == callee => Ok(t),
        _ => desync(
            event,
            format!("no claimable discard from {} (pending: {:?})", callee, stg.pending_discard),
        ),
    }
}

// 鳴き確定後の共通処理
fn after_call(stg: &mut RoundState, caller: House) {
    stg.turn = Some(caller);
    stg.pending_discard = None;
    stg.calls.clear();
}

// [Event]
fn event_deal(stg: &mut RoundState, me: House, event: &EventDeal) -> ReplicaResult<()> {
    if stg.tiles_count == 0 {
        return desync("deal", "wall is empty".to_string());
    }
    let h = event.house;
    let t = event.tile;
    if h == me && t.is_none() {
        return desync("deal", "local deal without tile".to_string());
    }

    stg.tiles_count -= 1;
    stg.turn = Some(h);
    stg.pending_discard = None;
    stg.calls.clear();
    match (h == me, t) {
        (true, Some(t)) => stg.hands[h].push(t),
        _ => stg.hands[h].push_hidden(),
    }
    Ok(())
}

fn event_discard(
    stg: &mut RoundState,
    me: House,
    rule: &Rule,
    event: &EventDiscard,
) -> ReplicaResult<()> {
    let h = event.house;
    let t = event.tile;
    check_turn(stg, "discard", h)?;
    if !stg.hands[h].remove(t, 1) {
        return desync("discard", format!("{} does not hold {}", h, t));
    }

    if event.riichi {
        stg.riichis[h] = true;
    }
    stg.discards[h].push(t);
    stg.turn = None;
    stg.pending_discard = Some(h);
    stg.calls.clear();

    if h != me {
        update_call_flags(stg, me, rule, h, t);
    }
    Ok(())
}

// 他家の打牌に対する自分の鳴き・ロン可否を更新
fn update_call_flags(stg: &mut RoundState, me: House, rule: &Rule, discarder: House, t: Tile) {
    let tiles = match stg.hands[me].tiles() {
        Some(tiles) => tiles,
        None => return,
    };

    let mut tt = tiles_to_tile_table(tiles);
    tt[t.0][t.1] += 1;
    let can_ron = is_win(&tt);
    tt[t.0][t.1] -= 1;

    let cnt = tt[t.0][t.1];
    let can_pon = cnt == 2;
    let can_kan = cnt == 3;
    let can_chi = rule.chi_eligibility && discarder.next() == me && can_complete_run(&tt, t);

    let calls = &mut stg.calls;
    if can_ron {
        calls.can_ron_source = Some(discarder);
    }
    if stg.riichis[me] && rule.riichi_blocks_calls {
        return;
    }
    if can_pon {
        calls.can_pon_source = Some(discarder);
    }
    if can_kan {
        calls.can_kan_source = Some(discarder);
    }
    if can_chi {
        calls.can_chi_source = Some(discarder);
    }
}

// 手牌の2枚と牌tで順子を作れるか
fn can_complete_run(tt: &TileTable, t: Tile) -> bool {
    if !t.is_suit() {
        return false;
    }
    let tr = &tt[t.0];
    let has = |ni: usize| (1..TNUM).contains(&ni) && tr[ni] > 0;
    let n = t.1;
    (n >= 3 && has(n - 2) && has(n - 1))
        || (n >= 2 && has(n - 1) && has(n + 1))
        || (has(n + 1) && has(n + 2))
}

fn event_pon(stg: &mut RoundState, event: &EventPon) -> ReplicaResult<()> {
    let (caller, callee) = (event.caller, event.callee);
    let t = check_pending(stg, "pon", caller, callee)?;
    if !stg.hands[caller].remove(t, 2) {
        return desync("pon", format!("{} does not hold two {}", caller, t));
    }

    stg.discards[callee].pop();
    stg.melds[caller].push(Meld::new(MeldType::Pon, t, &[t, t], callee));
    after_call(stg, caller);
    Ok(())
}

fn event_chi(stg: &mut RoundState, event: &EventChi) -> ReplicaResult<()> {
    let (caller, callee) = (event.caller, event.callee);
    if callee.next() != caller {
        return desync("chi", format!("{} cannot chi from {}", caller, callee));
    }
    let t = check_pending(stg, "chi", caller, callee)?;
    if !stg.hands[caller].remove_all(&event.consumed) {
        return desync(
            "chi",
            format!("{} does not hold {}{}", caller, event.consumed[0], event.consumed[1]),
        );
    }

    stg.discards[callee].pop();
    stg.melds[caller].push(Meld::new(MeldType::Chi, t, &event.consumed, callee));
    after_call(stg, caller);
    Ok(())
}

fn event_minkan(stg: &mut RoundState, event: &EventMinkan) -> ReplicaResult<()> {
    let (caller, callee) = (event.caller, event.callee);
    let t = check_pending(stg, "minkan", caller, callee)?;
    if !stg.hands[caller].remove(t, 3) {
        return desync("minkan", format!("{} does not hold three {}", caller, t));
    }

    stg.discards[callee].pop();
    stg.melds[caller].push(Meld::new(MeldType::Minkan, t, &[t, t, t], callee));
    after_call(stg, caller);
    Ok(())
}

fn event_ankan(stg: &mut RoundState, event: &EventAnkan) -> ReplicaResult<()> {
    let (h, t) = (event.house, event.tile);
    check_turn(stg, "ankan", h)?;
    if !stg.hands[h].remove(t, 4) {
        return desync("ankan", format!("{} does not hold four {}", h, t));
    }

    stg.melds[h].push(Meld::new(MeldType::Ankan, t, &[t; 4], h));
    Ok(())
}

fn event_kakan(stg: &mut RoundState, event: &EventKakan) -> ReplicaResult<()> {
    let (h, t) = (event.house, event.tile);
    check_turn(stg, "kakan", h)?;
    let idx = stg.melds[h]
        .iter()
        .position(|m| m.meld_type == MeldType::Pon && m.tile == t);
    let idx = match idx {
        Some(i) => i,
        None => return desync("kakan", format!("{} has no pon of {}", h, t)),
    };
    if !stg.hands[h].remove(t, 1) {
        return desync("kakan", format!("{} does not hold {}", h, t));
    }

    let m = &mut stg.melds[h][idx];
    m.meld_type = MeldType::Kakan;
    m.tiles.push(t);
    m.tiles.sort();
    Ok(())
}

fn event_dora(stg: &mut RoundState, event: &EventDora) -> ReplicaResult<()> {
    stg.dora_indicators.push(event.tile);
    Ok(())
}

// 和了者1人分の評価
fn score_win(
    stg: &RoundState,
    house: House,
    hand_tiles: &[Tile],
    winning_tile: Tile,
    is_tsumo: bool,
) -> ReplicaResult<(KyokuResult, Point)> {
    let tt = tiles_to_tile_table(hand_tiles);
    let ctx = evaluate_hand(
        &tt,
        &stg.melds[house],
        &stg.dora_indicators,
        winning_tile,
        is_tsumo,
        stg.riichis[house],
        stg.round.wind(),
        house.wind(),
    )
    .ok_or_else(|| ReplicaError::invalid_win(house, "not a winning hand"))?;

    let point = fan_to_point(ctx.fan, house.is_dealer())
        .ok_or_else(|| ReplicaError::invalid_win(house, "hand has no fan"))?;

    let yakus = ctx
        .yaku
        .iter()
        .map(|y| YakuResult {
            name: y.name.to_string(),
            fan: y.fan,
        })
        .collect();
    let res = KyokuResult {
        yakus,
        dora_count: ctx.n_dora,
        point_deltas: Houses::default(),
    };
    Ok((res, point))
}

fn apply_deltas(stg: &mut RoundState, deltas: &Houses<Point>) {
    for (h, d) in deltas.iter() {
        stg.points[h] += d;
    }
}

fn event_tsumo_win(stg: &mut RoundState, event: &EventTsumoWin) -> ReplicaResult<KyokuResult> {
    let h = event.house;
    check_turn(stg, "tsumo_win", h)?;
    if !event.hand_tiles.contains(&event.tsumo_tile) {
        return Err(ReplicaError::invalid_win(h, "tsumo tile is not in hand"));
    }

    let (mut res, point) = score_win(stg, h, &event.hand_tiles, event.tsumo_tile, true)?;
    res.point_deltas = tsumo_point_deltas(h, point);
    apply_deltas(stg, &res.point_deltas);
    Ok(res)
}

fn event_ron_win(
    stg: &mut RoundState,
    event: &EventRonWin,
) -> ReplicaResult<Houses<Option<KyokuResult>>> {
    let callee = event.callee;
    if event.callers.is_empty() {
        return desync("ron_win", "no callers".to_string());
    }
    if event.callers.contains(&callee) {
        return desync("ron_win", format!("{} ron on own discard", callee));
    }
    for (i, h) in event.callers.iter().enumerate() {
        if event.callers[..i].contains(h) {
            return desync("ron_win", format!("duplicate caller {}", h));
        }
    }
    let t = match stg.last_discard() {
        Some((h, t)) if h == callee => t,
        _ => {
            return desync(
                "ron_win",
                format!("no ron target from {} (pending: {:?})", callee, stg.pending_discard),
            )
        }
    };

    // 和了の成否に関わらずロンの権利は消化済み
    stg.calls.can_ron_source = None;

    // 全員分を評価してから点数を移動
    let mut results = Houses::default();
    for &h in &event.callers {
        let mut tiles = event.hand_tiles[h].clone();
        tiles.push(t);
        let (mut res, point) = score_win(stg, h, &tiles, t, false)?;
        res.point_deltas = ron_point_deltas(h, callee, point);
        results[h] = Some(res);
    }

    for (_, r) in results.iter() {
        if let Some(r) = r {
            apply_deltas(stg, &r.point_deltas);
        }
    }
    Ok(results)
}

fn event_nop(stg: &mut RoundState, _event: &EventNop) -> ReplicaResult<()> {
    stg.calls.clear();
    Ok(())
}

#[cfg(test)]
fn test_engine(hand: &str) -> PlayerEngine {
    use super::string::tiles_from_string;
    let hand_tiles = tiles_from_string(hand).unwrap();
    let init = RoundInit {
        user_houses: House::ALL,
        round: House::E,
        kyoku: 1,
        tiles_count: 70,
        dora_indicators: vec![],
        hand_counts: Houses::new(hand_tiles.len(), 13, 13, 13),
        hand_tiles,
        points: Houses::new(25000, 25000, 25000, 25000),
    };
    PlayerEngine::new(0, init, Rule::default(), vec![]).unwrap()
}

#[test]
fn test_snapshot_validation() {
    use super::string::tiles_from_string;
    let init = RoundInit {
        user_houses: [House::E, House::E, House::W, House::N],
        round: House::E,
        kyoku: 1,
        tiles_count: 70,
        dora_indicators: vec![],
        hand_tiles: tiles_from_string("m123").unwrap(),
        hand_counts: Houses::new(3, 13, 13, 13),
        points: Houses::default(),
    };
    let e = PlayerEngine::new(0, init.clone(), Rule::default(), vec![]).unwrap_err();
    assert!(matches!(e, ReplicaError::Snapshot { .. }));

    let mut init = init;
    init.user_houses = House::ALL;
    init.hand_counts[House::E] = 13;
    assert!(PlayerEngine::new(0, init.clone(), Rule::default(), vec![]).is_err());
    assert!(PlayerEngine::new(4, init, Rule::default(), vec![]).is_err());
}

#[test]
fn test_call_flags() {
    // 自分は東, 北の打牌はチー可能
    let mut eng = test_engine("m23p55s777z1234567");
    eng.state.turn = Some(House::N);
    eng.commit_discard(House::N, Tile(TM, 4), false).unwrap();
    assert_eq!(eng.state.calls.can_chi_source, Some(House::N));
    assert_eq!(eng.state.calls.can_pon_source, None);

    eng.commit_nop().unwrap();
    assert!(eng.state.calls.is_empty());
    assert_eq!(eng.state.pending_discard, Some(House::N));

    // 南の打牌はチー不可
    eng.state.turn = Some(House::S);
    eng.commit_discard(House::S, Tile(TP, 5), false).unwrap();
    assert_eq!(eng.state.calls.can_pon_source, Some(House::S));
    assert_eq!(eng.state.calls.can_chi_source, None);

    eng.state.turn = Some(House::W);
    eng.commit_discard(House::W, Tile(TS, 7), false).unwrap();
    assert_eq!(eng.state.calls.can_kan_source, Some(House::W));
    assert_eq!(eng.state.calls.can_pon_source, None);
}

#[test]
fn test_riichi_blocks_calls() {
    let mut eng = test_engine("m123456789p11z55");
    eng.state.riichis[House::E] = true;
    eng.state.turn = Some(House::S);
    eng.commit_discard(House::S, Tile(TZ, DW), false).unwrap();
    // ロンは可能, ポンは不可
    assert_eq!(eng.state.calls.can_ron_source, Some(House::S));
    assert_eq!(eng.state.calls.can_pon_source, None);
}

#[test]
fn test_chi_kan() {
    let mut eng = test_engine("m23p55s777z1234567");
    eng.state.turn = Some(House::N);
    eng.commit_discard(House::N, Tile(TM, 4), false).unwrap();
    eng.commit_chi(House::E, House::N, [Tile(TM, 2), Tile(TM, 3)]).unwrap();
    assert_eq!(eng.state.turn, Some(House::E));
    assert!(eng.state.discards[House::N].is_empty());
    assert_eq!(eng.state.melds[House::E][0].meld_type, MeldType::Chi);
    assert_eq!(eng.state.hands[House::E].len(), 12);

    eng.commit_ankan(House::E, Tile(TS, 7)).unwrap_err(); // 3枚しかない
    assert!(eng.is_desynced());
}

#[test]
fn test_kakan() {
    let mut eng = test_engine("m234p55s789z123455");
    eng.state.turn = Some(House::N);
    eng.commit_discard(House::N, Tile(TZ, DW), false).unwrap();
    eng.commit_pon(House::E, House::N).unwrap();
    assert_eq!(eng.state.hands[House::E].len(), 12);
    eng.commit_discard(House::E, Tile(TZ, 1), false).unwrap();

    eng.commit_deal(House::S, None).unwrap();
    eng.commit_discard(House::S, Tile(TM, 1), false).unwrap();
    eng.commit_deal(House::E, Some(Tile(TZ, DW))).unwrap();
    eng.commit_kakan(House::E, Tile(TZ, DW)).unwrap();
    let m = &eng.state.melds[House::E][0];
    assert_eq!(m.meld_type, MeldType::Kakan);
    assert_eq!(m.tiles.len(), 4);
    assert!(!eng.state.is_menzen(House::E));
}
