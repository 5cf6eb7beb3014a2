use super::*;

// 権威側(サーバ)から確定済みとして送られてくるイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Deal(EventDeal),         // ツモ
    Discard(EventDiscard),   // 打牌
    Pon(EventPon),           // ポン
    Chi(EventChi),           // チー
    Minkan(EventMinkan),     // 大明槓
    Ankan(EventAnkan),       // 暗槓
    Kakan(EventKakan),       // 加槓
    Dora(EventDora),         // 新ドラ
    TsumoWin(EventTsumoWin), // ツモ和了
    RonWin(EventRonWin),     // ロン和了
    Nop(EventNop),           // 鳴き・ロンなし
}

impl Event {
    #[inline]
    pub fn deal(house: House, tile: Option<Tile>) -> Self {
        Self::Deal(EventDeal { house, tile })
    }

    #[inline]
    pub fn discard(house: House, tile: Tile, riichi: bool) -> Self {
        Self::Discard(EventDiscard {
            house,
            tile,
            riichi,
        })
    }

    #[inline]
    pub fn pon(caller: House, callee: House) -> Self {
        Self::Pon(EventPon { caller, callee })
    }

    #[inline]
    pub fn chi(caller: House, callee: House, consumed: [Tile; 2]) -> Self {
        Self::Chi(EventChi {
            caller,
            callee,
            consumed,
        })
    }

    #[inline]
    pub fn minkan(caller: House, callee: House) -> Self {
        Self::Minkan(EventMinkan { caller, callee })
    }

    #[inline]
    pub fn ankan(house: House, tile: Tile) -> Self {
        Self::Ankan(EventAnkan { house, tile })
    }

    #[inline]
    pub fn kakan(house: House, tile: Tile) -> Self {
        Self::Kakan(EventKakan { house, tile })
    }

    #[inline]
    pub fn dora(tile: Tile) -> Self {
        Self::Dora(EventDora { tile })
    }

    #[inline]
    pub fn tsumo_win(house: House, hand_tiles: Vec<Tile>, tsumo_tile: Tile) -> Self {
        Self::TsumoWin(EventTsumoWin {
            house,
            hand_tiles,
            tsumo_tile,
        })
    }

    #[inline]
    pub fn ron_win(callers: Vec<House>, callee: House, hand_tiles: Houses<Vec<Tile>>) -> Self {
        Self::RonWin(EventRonWin {
            callers,
            callee,
            hand_tiles,
        })
    }

    #[inline]
    pub fn nop() -> Self {
        Self::Nop(EventNop {})
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Deal(_) => "deal",
            Event::Discard(_) => "discard",
            Event::Pon(_) => "pon",
            Event::Chi(_) => "chi",
            Event::Minkan(_) => "minkan",
            Event::Ankan(_) => "ankan",
            Event::Kakan(_) => "kakan",
            Event::Dora(_) => "dora",
            Event::TsumoWin(_) => "tsumo_win",
            Event::RonWin(_) => "ron_win",
            Event::Nop(_) => "nop",
        }
    }
}

// 他家のツモ牌は通常送られてこない. 送られてきても保持しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDeal {
    pub house: House,
    #[serde(default)]
    pub tile: Option<Tile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDiscard {
    pub house: House,
    pub tile: Tile,
    #[serde(default)]
    pub riichi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPon {
    pub caller: House, // ポンした家
    pub callee: House, // 牌を捨てた家
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChi {
    pub caller: House,
    pub callee: House,
    pub consumed: [Tile; 2], // 手牌から出した2枚
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMinkan {
    pub caller: House,
    pub callee: House,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnkan {
    pub house: House,
    pub tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKakan {
    pub house: House,
    pub tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDora {
    pub tile: Tile, // ドラ表示牌
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTsumoWin {
    pub house: House,
    pub hand_tiles: Vec<Tile>, // 和了牌を含む手牌(副露を含まない)
    pub tsumo_tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRonWin {
    pub callers: Vec<House>,          // ロンした家 (複数可)
    pub callee: House,                // 牌を捨てた家
    pub hand_tiles: Houses<Vec<Tile>>, // 公開された手牌 (ロン牌は含まない)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNop {}

#[test]
fn test_event_json() {
    let e: Event =
        serde_json::from_str(r#"{"type": "Discard", "house": "s", "tile": "p5", "riichi": true}"#)
            .unwrap();
    assert_eq!(e, Event::discard(House::S, Tile(TP, 5), true));

    let e: Event = serde_json::from_str(r#"{"type": "Deal", "house": "w"}"#).unwrap();
    assert_eq!(e, Event::deal(House::W, None));

    let e = Event::nop();
    let s = serde_json::to_string(&e).unwrap();
    assert_eq!(serde_json::from_str::<Event>(&s).unwrap(), e);
}
