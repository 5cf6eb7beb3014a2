use super::engine::PlayerEngine;
use crate::hand::calc_discards_to_tenpai;
use crate::model::*;

// 読み取り専用の問い合わせ (毎回現在の状態から計算する)
impl PlayerEngine {
    #[inline]
    pub fn me(&self) -> House {
        self.me
    }

    #[inline]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[inline]
    pub fn is_desynced(&self) -> bool {
        self.desynced
    }

    pub fn my_hand_tiles(&self) -> &[Tile] {
        self.state.hands[self.me].tiles().unwrap_or(&[])
    }

    pub fn is_me_riichi(&self) -> bool {
        self.state.riichis[self.me]
    }

    pub fn doras(&self) -> Vec<Tile> {
        self.state.doras()
    }

    // ポン, チー, 明槓, 加槓がなければ門前 (暗槓は可)
    pub fn is_menzen(&self) -> bool {
        self.state.is_menzen(self.me)
    }

    // 打牌すると聴牌になる牌の一覧
    pub fn tiles_for_riichi(&self) -> Vec<Tile> {
        let tt = tiles_to_tile_table(self.my_hand_tiles());
        calc_discards_to_tenpai(&tt)
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    pub fn can_riichi(&self) -> bool {
        let me = self.me;
        self.state.turn == Some(me)
            && !self.state.riichis[me]
            && self.state.points[me] >= self.rule.riichi_min_score
            && self.is_menzen()
            && !self.tiles_for_riichi().is_empty()
    }

    // 以下は鳴き・ロンの対象となる打牌をした家 (不可能な場合はNone)
    pub fn can_pon(&self) -> Option<House> {
        self.state.calls.can_pon_source
    }

    pub fn can_chi(&self) -> Option<House> {
        self.state.calls.can_chi_source
    }

    pub fn can_kan(&self) -> Option<House> {
        self.state.calls.can_kan_source
    }

    pub fn can_ron(&self) -> Option<House> {
        self.state.calls.can_ron_source
    }
}

#[cfg(test)]
fn riichi_engine(hand: &str, points: Score) -> PlayerEngine {
    use super::string::tiles_from_string;
    let hand_tiles = tiles_from_string(hand).unwrap();
    let init = RoundInit {
        user_houses: [House::S, House::W, House::N, House::E],
        round: House::E,
        kyoku: 1,
        tiles_count: 70,
        dora_indicators: vec![Tile(TM, 9)],
        // ユーザ3は東家なので東の枠に自分の値を入れる
        hand_counts: Houses::new(hand_tiles.len(), 13, 13, 13),
        hand_tiles,
        points: Houses::new(points, 25000, 25000, 25000),
    };
    PlayerEngine::new(3, init, Rule::default(), vec![]).unwrap()
}

#[test]
fn test_can_riichi() {
    let mut eng = riichi_engine("m123456789p11z11", 25000);
    assert_eq!(eng.me(), House::E);
    assert_eq!(eng.doras(), vec![Tile(TM, 1)]);
    assert!(!eng.can_riichi()); // 手番ではない

    eng.commit_deal(House::E, Some(Tile(TZ, DR))).unwrap();
    assert_eq!(eng.tiles_for_riichi(), vec![Tile(TZ, DR)]);
    assert!(eng.can_riichi());

    eng.commit_discard(House::E, Tile(TZ, DR), true).unwrap();
    assert!(eng.is_me_riichi());
    assert!(!eng.can_riichi()); // 打牌後は手番なし
}

#[test]
fn test_can_riichi_conditions() {
    // 持ち点不足
    let mut eng = riichi_engine("m123456789p11z11", 900);
    assert_eq!(eng.state().points[House::E], 900);
    eng.commit_deal(House::E, Some(Tile(TZ, DR))).unwrap();
    assert!(!eng.tiles_for_riichi().is_empty());
    assert!(!eng.can_riichi());

    // 下限ちょうどは可能
    let mut eng = riichi_engine("m123456789p11z11", 1000);
    eng.commit_deal(House::E, Some(Tile(TZ, DR))).unwrap();
    assert!(eng.can_riichi());

    // 聴牌にならない
    let mut eng = riichi_engine("m13579p13579s135", 25000);
    eng.commit_deal(House::E, Some(Tile(TZ, DR))).unwrap();
    assert!(eng.tiles_for_riichi().is_empty());
    assert!(!eng.can_riichi());
}

#[test]
fn test_is_menzen() {
    let mut eng = riichi_engine("m123456789p11z55", 25000);
    assert!(eng.is_menzen());
    eng.commit_deal(House::N, None).unwrap();
    eng.commit_discard(House::N, Tile(TZ, DW), false).unwrap();
    assert_eq!(eng.can_pon(), Some(House::N));
    assert_eq!(eng.can_chi(), None);
    assert_eq!(eng.can_ron(), Some(House::N));
    eng.commit_pon(House::E, House::N).unwrap();
    assert!(!eng.is_menzen());
    assert_eq!(eng.my_hand_tiles().len(), 11);
    assert_eq!(eng.can_pon(), None);
}
