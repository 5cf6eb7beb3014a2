use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mahjong_replica::control::string::tiles_from_string;
use mahjong_replica::control::PlayerEngine;
use mahjong_replica::errors::ReplicaError;
use mahjong_replica::hand::{fan_to_point, ron_point_deltas, tsumo_point_deltas};
use mahjong_replica::listener::Listener;
use mahjong_replica::model::*;

use House::*;

const INITIAL_POINTS: Score = 25000;

fn tiles(exp: &str) -> Vec<Tile> {
    tiles_from_string(exp).unwrap()
}

fn tile(sym: &str) -> Tile {
    Tile::from_symbol(sym).unwrap()
}

// ユーザ0(東家)視点のエンジン
fn new_engine(hand: &str, dora_indicators: &str, listeners: Vec<Box<dyn Listener>>) -> PlayerEngine {
    let hand_tiles = tiles(hand);
    let init = RoundInit {
        user_houses: House::ALL,
        round: E,
        kyoku: 1,
        tiles_count: 70,
        dora_indicators: tiles(dora_indicators),
        hand_counts: Houses::new(hand_tiles.len(), 13, 13, 13),
        hand_tiles,
        points: Houses::new(INITIAL_POINTS, INITIAL_POINTS, INITIAL_POINTS, INITIAL_POINTS),
    };
    PlayerEngine::new(0, init, Rule::default(), listeners).unwrap()
}

#[derive(Debug, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Listener for Recorder {
    fn notify_event(&mut self, _state: &RoundState, event: &Event) {
        self.log.lock().unwrap().push(event.name().to_string());
    }

    fn notify_result(&mut self, state: &RoundState, result: &WinResult) {
        let deltas = result.point_deltas();
        assert_eq!(deltas.sum(), 0);
        self.log
            .lock()
            .unwrap()
            .push(format!("result e:{}", state.points[E]));
    }

    fn notify_desync(&mut self, _state: &RoundState, event: &Event, _error: &ReplicaError) {
        self.log
            .lock()
            .unwrap()
            .push(format!("desync {}", event.name()));
    }
}

#[test]
fn test_ron_scenario() {
    let log = Arc::new(Mutex::new(vec![]));
    let recorder = Recorder { log: log.clone() };
    let mut eng = new_engine("m234567p234s2388", "", vec![Box::new(recorder)]);

    eng.commit_deal(E, Some(tile("z7"))).unwrap();
    eng.commit_discard(E, tile("z7"), false).unwrap();
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("s4"), false).unwrap();
    assert_eq!(eng.can_ron(), Some(S));
    assert_eq!(eng.can_chi(), None); // 南の打牌は東からチーできない

    let hands = Houses::new(tiles("m234567p234s2388"), vec![], vec![], vec![]);
    let rs = eng.commit_ron_win(vec![E], S, hands).unwrap();

    // 断么九 + 平和 + 三色同順 = 4翻 親 12000点
    let r = rs[E].as_ref().unwrap();
    assert_eq!(r.fan(), 4);
    assert_eq!(r.point_deltas, Houses::new(12000, -12000, 0, 0));
    assert!(rs[S].is_none() && rs[W].is_none() && rs[N].is_none());
    assert_eq!(eng.state().points, Houses::new(37000, 13000, 25000, 25000));
    assert_eq!(eng.can_ron(), None);

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec!["deal", "discard", "deal", "discard", "ron_win", "result e:37000"]
    );
}

#[test]
fn test_double_ron() {
    let mut eng = new_engine("m234567p234s2388", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("s4"), false).unwrap();

    // 西: 一気通貫 + 平和 = 3翻 子 3900点
    let hands = Houses::new(tiles("m234567p234s2388"), vec![], tiles("m123456789p11s23"), vec![]);
    let rs = eng.commit_ron_win(vec![E, W], S, hands).unwrap();
    assert_eq!(rs[W].as_ref().unwrap().fan(), 3);
    assert_eq!(eng.state().points, Houses::new(37000, 9100, 28900, 25000));
    assert_eq!(eng.state().points.sum(), 4 * INITIAL_POINTS);
}

#[test]
fn test_ron_failure_keeps_points() {
    let mut eng = new_engine("m234567p234s2388", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("s4"), false).unwrap();

    // 西の手牌が和了形でない場合は誰の点数も動かない
    let hands = Houses::new(tiles("m234567p234s2388"), vec![], tiles("m123456789p19s23"), vec![]);
    let e = eng.commit_ron_win(vec![E, W], S, hands).unwrap_err();
    assert_eq!(e, ReplicaError::invalid_win(W, "not a winning hand"));
    assert!(!eng.is_desynced());
    assert_eq!(eng.can_ron(), None); // 失敗してもロンの権利は消化済み
    assert_eq!(eng.state().points.sum(), 4 * INITIAL_POINTS);
    assert_eq!(eng.state().points[E], INITIAL_POINTS);

    // 打牌した本人はロンできない
    let hands = Houses::new(vec![], tiles("m234567p234s2388"), vec![], vec![]);
    let e = eng.commit_ron_win(vec![S], S, hands).unwrap_err();
    assert!(e.is_desync());
}

#[test]
fn test_tsumo_payments() {
    // 子(南)のツモ: 門前自摸 + 断么九 + 平和 + 三色同順 = 5翻 満貫
    let mut eng = new_engine("m123456789p11z11", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    let r = eng
        .commit_tsumo_win(S, tiles("m234567p234s23488"), tile("s4"))
        .unwrap();
    assert_eq!(r.fan(), 5);
    assert_eq!(r.point_deltas, Houses::new(-4000, 8000, -2000, -2000));
    assert_eq!(r.point_deltas.sum(), 0);

    // 親(東)のツモ: 子の支払いはすべて同額
    let mut eng = new_engine("m234567p234s2388", "", vec![]);
    eng.commit_deal(E, Some(tile("s4"))).unwrap();
    let r = eng
        .commit_tsumo_win(E, tiles("m234567p234s23488"), tile("s4"))
        .unwrap();
    assert_eq!(r.point_deltas, Houses::new(12000, -4000, -4000, -4000));
    assert_eq!(eng.state().points[E], 37000);
}

#[test]
fn test_dora_count() {
    // 表示牌m1 -> ドラm2 (手牌に1枚)
    let mut eng = new_engine("m234567p234s2388", "m1", vec![]);
    assert_eq!(eng.doras(), vec![tile("m2")]);
    eng.commit_deal(E, Some(tile("s4"))).unwrap();
    let r = eng
        .commit_tsumo_win(E, tiles("m234567p234s23488"), tile("s4"))
        .unwrap();
    assert_eq!(r.dora_count, 1);
    assert_eq!(r.fan(), 6);
    assert_eq!(r.point_deltas, Houses::new(18000, -6000, -6000, -6000));
}

#[test]
fn test_ron_tile_not_dora() {
    // 表示牌s3 -> ドラs4: ロン牌のs4は数えない
    let mut eng = new_engine("m234567p234s2388", "s3", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("s4"), false).unwrap();
    let hands = Houses::new(tiles("m234567p234s2388"), vec![], vec![], vec![]);
    let rs = eng.commit_ron_win(vec![E], S, hands).unwrap();
    let r = rs[E].as_ref().unwrap();
    assert_eq!(r.dora_count, 0);
    assert_eq!(r.point_deltas, Houses::new(12000, -12000, 0, 0));

    // ツモなら自分で引いた牌なので数える
    let mut eng = new_engine("m234567p234s2388", "s3", vec![]);
    eng.commit_deal(E, Some(tile("s4"))).unwrap();
    let r = eng
        .commit_tsumo_win(E, tiles("m234567p234s23488"), tile("s4"))
        .unwrap();
    assert_eq!(r.dora_count, 1);
    assert_eq!(r.fan(), 6);
}

#[test]
fn test_tsumo_off_turn() {
    let mut eng = new_engine("m234567p234s2388", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    let e = eng
        .commit_tsumo_win(E, tiles("m234567p234s23488"), tile("s4"))
        .unwrap_err();
    assert!(e.is_desync());
    assert!(eng.is_desynced());
    assert_eq!(eng.state().points, Houses::new(25000, 25000, 25000, 25000));
}

#[test]
fn test_zero_fan_tsumo() {
    let mut eng = new_engine("m123678s2399p55z1", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("p5"), false).unwrap();
    assert_eq!(eng.can_pon(), Some(S));
    eng.commit_pon(E, S).unwrap();
    eng.commit_discard(E, tile("z1"), false).unwrap();
    for h in [S, W, N] {
        eng.commit_deal(h, None).unwrap();
        eng.commit_discard(h, tile("m9"), false).unwrap();
    }
    eng.commit_deal(E, Some(tile("s4"))).unwrap();

    // 鳴きありで役なし, ドラなし
    let e = eng
        .commit_tsumo_win(E, tiles("m123678s23499"), tile("s4"))
        .unwrap_err();
    assert!(matches!(e, ReplicaError::InvalidWin { house: E, .. }));
    assert!(!e.is_desync());
    assert!(!eng.is_desynced());
    assert_eq!(eng.state().points, Houses::new(25000, 25000, 25000, 25000));
}

#[test]
fn test_discard_turn() {
    let mut eng = new_engine("m123456789p11z11", "", vec![]);

    // 手番でない打牌はdesync
    let e = eng.commit_discard(S, tile("p5"), false).unwrap_err();
    assert!(e.is_desync());
    assert!(eng.is_desynced());

    // 以降のイベントはすべて拒否
    let e = eng.commit_deal(S, None).unwrap_err();
    assert!(e.is_desync());
    assert_eq!(eng.state().tiles_count, 70);

    // 手番の打牌は成功し, 手番はなしになる
    let mut eng = new_engine("m123456789p11z11", "", vec![]);
    eng.commit_deal(E, Some(tile("z7"))).unwrap();
    assert_eq!(eng.state().turn, Some(E));
    eng.commit_discard(E, tile("z7"), false).unwrap();
    assert_eq!(eng.state().turn, None);
    assert_eq!(eng.state().discards[E], vec![tile("z7")]);

    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("p5"), false).unwrap();
    assert_eq!(eng.state().turn, None);
    assert_eq!(eng.state().hands[S], Hand::Hidden(13));
}

#[test]
fn test_pon_effects() {
    let mut eng = new_engine("m123456789p11z55", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("z5"), false).unwrap();
    assert_eq!(eng.state().discards[S].len(), 1);

    eng.commit_pon(E, S).unwrap();
    let st = eng.state();
    assert!(st.discards[S].is_empty());
    assert_eq!(st.hands[E].len(), 11);
    assert_eq!(st.melds[E].len(), 1);
    assert_eq!(st.melds[E][0].from, S);
    assert_eq!(st.melds[E][0].meld_type, MeldType::Pon);
    assert_eq!(st.turn, Some(E));
    assert!(st.pending_discard.is_none());
    assert!(!eng.is_menzen());

    // 他家のポン (手牌の枚数のみ減る)
    eng.commit_discard(E, tile("p1"), false).unwrap();
    eng.commit_pon(N, E).unwrap();
    assert_eq!(eng.state().hands[N], Hand::Hidden(11));
    assert_eq!(eng.state().turn, Some(N));

    // 鳴かれた打牌を再度鳴くことはできない
    let e = eng.commit_pon(W, E).unwrap_err();
    assert!(e.is_desync());
}

#[test]
fn test_minkan_effects() {
    let mut eng = new_engine("m123456789p555z1", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("p5"), false).unwrap();
    assert_eq!(eng.can_kan(), Some(S));
    assert_eq!(eng.can_pon(), None); // 3枚持ちはカンのみ

    eng.commit_minkan(E, S).unwrap();
    let st = eng.state();
    assert!(st.discards[S].is_empty());
    assert_eq!(st.hands[E].len(), 10);
    assert_eq!(st.melds[E].len(), 1);
    assert_eq!(st.melds[E][0].meld_type, MeldType::Minkan);
    assert_eq!(st.melds[E][0].from, S);
    assert_eq!(st.melds[E][0].tiles, tiles("p5555"));
    assert_eq!(st.turn, Some(E));
    assert!(st.pending_discard.is_none());
    assert_eq!(eng.can_kan(), None);
    assert_eq!(eng.can_ron(), None);
    assert!(!eng.is_menzen());

    // 嶺上牌を引いて打牌
    eng.commit_deal(E, Some(tile("z1"))).unwrap();
    eng.commit_discard(E, tile("z1"), false).unwrap();
    assert_eq!(eng.state().hands[E].len(), 10);
}

#[test]
fn test_ankan_effects() {
    let mut eng = new_engine("m123456789p555z1", "", vec![]);
    eng.commit_deal(E, Some(tile("p5"))).unwrap();
    eng.commit_ankan(E, tile("p5")).unwrap();
    let st = eng.state();
    assert_eq!(st.hands[E].len(), 10);
    assert_eq!(st.melds[E][0].meld_type, MeldType::Ankan);
    assert_eq!(st.melds[E][0].from, E);
    assert_eq!(st.melds[E][0].tiles, tiles("p5555"));
    assert_eq!(st.turn, Some(E));
    assert!(eng.is_menzen()); // 暗槓は門前のまま

    eng.commit_deal(E, Some(tile("z1"))).unwrap();
    eng.commit_discard(E, tile("z1"), false).unwrap();

    // 他家の暗槓は枚数のみで判定
    eng.commit_deal(S, None).unwrap();
    eng.commit_ankan(S, tile("z7")).unwrap();
    assert_eq!(eng.state().hands[S], Hand::Hidden(10));
    assert_eq!(eng.state().melds[S][0].from, S);
    assert_eq!(eng.state().melds[S][0].tiles.len(), 4);

    // 手番でない暗槓
    let e = eng.commit_ankan(W, tile("z6")).unwrap_err();
    assert!(e.is_desync());
}

#[test]
fn test_remote_chi() {
    let mut eng = new_engine("m123456789p11z11", "", vec![]);
    eng.commit_deal(S, None).unwrap();
    eng.commit_discard(S, tile("p5"), false).unwrap();
    assert_eq!(eng.can_chi(), None);

    eng.commit_chi(W, S, [tile("p4"), tile("p6")]).unwrap();
    let st = eng.state();
    assert_eq!(st.hands[W], Hand::Hidden(11));
    assert!(st.discards[S].is_empty());
    assert_eq!(st.melds[W][0].meld_type, MeldType::Chi);
    assert_eq!(st.melds[W][0].from, S);
    assert_eq!(st.melds[W][0].tiles, tiles("p456"));
    assert_eq!(st.turn, Some(W));

    // 上家以外からはチーできない
    eng.commit_discard(W, tile("m1"), false).unwrap();
    let e = eng.commit_chi(E, W, [tile("m2"), tile("m3")]).unwrap_err();
    assert!(e.is_desync());
}

#[test]
fn test_riichi_persistence() {
    let mut eng = new_engine("m234567p234s2388", "", vec![]);
    eng.commit_deal(E, Some(tile("z7"))).unwrap();
    assert!(eng.can_riichi());
    eng.commit_discard(E, tile("z7"), true).unwrap();
    assert!(eng.is_me_riichi());

    for h in [S, W, N] {
        eng.commit_deal(h, None).unwrap();
        eng.commit_discard(h, tile("z1"), h == W).unwrap();
        eng.commit_nop().unwrap();
    }
    eng.commit_dora(tile("p9")).unwrap();
    eng.commit_deal(E, Some(tile("z6"))).unwrap();
    eng.commit_discard(E, tile("z6"), false).unwrap();

    let st = eng.state();
    assert!(st.riichis[E]);
    assert!(st.riichis[W]);
    assert!(!st.riichis[S] && !st.riichis[N]);
    assert!(!eng.can_riichi());
}

#[test]
fn test_random_point_deltas() {
    let mut rng = StdRng::seed_from_u64(20240101);
    for _ in 0..500 {
        let winner = House::from_index(rng.gen_range(0..SEAT));
        let fan = rng.gen_range(1..=26);
        let point = fan_to_point(fan, winner.is_dealer()).unwrap();

        let d = tsumo_point_deltas(winner, point);
        assert_eq!(d.sum(), 0);
        assert!(d[winner] >= point);
        let payers: Vec<Point> = d.iter().filter(|(h, _)| *h != winner).map(|(_, &p)| p).collect();
        if winner.is_dealer() {
            assert!(payers.iter().all(|&p| p == payers[0]));
        } else {
            // 子の支払いは同額, 親は子の約2倍
            let children: Vec<Point> = d
                .iter()
                .filter(|(h, _)| *h != winner && !h.is_dealer())
                .map(|(_, &p)| p)
                .collect();
            assert_eq!(children[0], children[1]);
            assert!((d[E] - children[0] * 2).abs() <= 100);
        }

        let callee = House::from_index(winner.index() + rng.gen_range(1..SEAT));
        let d = ron_point_deltas(winner, callee, point);
        assert_eq!(d.sum(), 0);
        assert_eq!(d[winner], point);
    }
}

#[test]
fn test_random_walk() {
    // ツモ切りを繰り返しても枚数と手番の不変条件が保たれる
    let mut rng = StdRng::seed_from_u64(7);
    let mut eng = new_engine("m1p1s1z1234567m9p9s9", "", vec![]);
    for i in 0..60 {
        let h = House::from_index(i);
        let t = Tile(rng.gen_range(0..3), rng.gen_range(1..TNUM));
        if h == E {
            eng.commit_deal(E, Some(t)).unwrap();
            assert_eq!(eng.my_hand_tiles().len(), 14);
        } else {
            eng.commit_deal(h, None).unwrap();
        }
        eng.commit_discard(h, t, false).unwrap();

        let st = eng.state();
        assert_eq!(st.tiles_count, 70 - (i + 1));
        assert_eq!(st.turn, None);
        assert_eq!(st.pending_discard, Some(h));
        for h in House::ALL {
            assert_eq!(st.hands[h].len(), 13);
        }
        assert_eq!(eng.can_pon(), None); // 同じ牌を2枚以上持たない
    }
    assert!(!eng.is_desynced());
}
