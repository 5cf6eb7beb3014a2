use super::*;

// 局開始時の配牌情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundInit {
    pub user_houses: [House; SEAT], // ユーザ番号 -> 座席
    pub round: House,               // 場風
    pub kyoku: usize,               // 局
    pub tiles_count: usize,         // 牌山の残り枚数
    pub dora_indicators: Vec<Tile>, // ドラ表示牌
    pub hand_tiles: Vec<Tile>,      // 自分の手牌
    pub hand_counts: Houses<usize>, // 各家の手牌の枚数
    pub points: Houses<Score>,      // 持ち点
}

// 自分が直前の打牌に対して可能な鳴き (値は打牌した家)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlags {
    pub can_pon_source: Option<House>,
    pub can_chi_source: Option<House>,
    pub can_kan_source: Option<House>,
    pub can_ron_source: Option<House>,
}

impl CallFlags {
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub user_houses: [House; SEAT],      // ユーザ番号 -> 座席
    pub round: House,                    // 場風
    pub kyoku: usize,                    // 局
    pub tiles_count: usize,              // 牌山の残り枚数
    pub dora_indicators: Vec<Tile>,      // ドラ表示牌
    pub hands: Houses<Hand>,             // 手牌(副露を含まない)
    pub discards: Houses<Vec<Tile>>,     // 河 (鳴かれた牌は取り除かれる)
    pub melds: Houses<Vec<Meld>>,        // 副露
    pub riichis: Houses<bool>,           // リーチ (一度立てば局の終わりまで不変)
    pub points: Houses<Score>,           // 持ち点
    pub turn: Option<House>,             // 手番 打牌から次の操作までの間はNone
    pub pending_discard: Option<House>,  // 鳴き・ロンの対象となりうる打牌をした家
    pub calls: CallFlags,                // 自分の鳴き・ロン可能フラグ
}

impl RoundState {
    pub fn new(me: House, init: RoundInit) -> Self {
        let hand_tiles = init.hand_tiles;
        let counts = init.hand_counts;
        let hands = Houses::from_fn(|h| {
            if h == me {
                Hand::Shown(hand_tiles.clone())
            } else {
                Hand::Hidden(counts[h])
            }
        });

        Self {
            user_houses: init.user_houses,
            round: init.round,
            kyoku: init.kyoku,
            tiles_count: init.tiles_count,
            dora_indicators: init.dora_indicators,
            hands,
            discards: Houses::default(),
            melds: Houses::default(),
            riichis: Houses::default(),
            points: init.points,
            turn: None,
            pending_discard: None,
            calls: CallFlags::default(),
        }
    }

    // 直前の打牌 (鳴かれずに河に残っている場合のみ)
    pub fn last_discard(&self) -> Option<(House, Tile)> {
        let h = self.pending_discard?;
        self.discards[h].last().map(|&t| (h, t))
    }

    // ドラ表示牌から求めたドラ
    pub fn doras(&self) -> Vec<Tile> {
        self.dora_indicators.iter().map(|t| t.next_dora()).collect()
    }

    pub fn is_menzen(&self, house: House) -> bool {
        self.melds[house].iter().all(|m| !m.is_open())
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "round: {}, kyoku: {}, tiles_count: {}, doras: {}",
            self.round,
            self.kyoku,
            self.tiles_count,
            vec_to_string(&self.dora_indicators),
        )?;
        writeln!(
            f,
            "turn: {:?}, pending_discard: {:?}, calls: {:?}",
            self.turn, self.pending_discard, self.calls,
        )?;

        let boader = "-".repeat(80);
        write!(f, "{}", boader)?;
        for h in House::ALL {
            writeln!(f)?;
            writeln!(
                f,
                "house: {}, points: {}, riichi: {}",
                h, self.points[h], self.riichis[h],
            )?;
            writeln!(f, "hand: {}", self.hands[h])?;
            writeln!(f, "melds: {}", vec_to_string(&self.melds[h]))?;
            writeln!(f, "discards: {}", vec_to_string(&self.discards[h]))?;
            write!(f, "{}", boader)?;
        }
        Ok(())
    }
}
