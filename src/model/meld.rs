use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeldType {
    Pon,
    Chi,
    Minkan,
    Ankan,
    Kakan,
}

// 副露
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tile: Tile,       // 鳴いた牌 (暗槓の場合は槓子の牌)
    pub tiles: Vec<Tile>, // 面子を構成するすべての牌(ソート済み)
    pub from: House,      // 鳴いた牌の出どころ (暗槓は自分)
}

impl Meld {
    pub fn new(meld_type: MeldType, tile: Tile, consumed: &[Tile], from: House) -> Self {
        let mut tiles = consumed.to_vec();
        if meld_type != MeldType::Ankan {
            tiles.push(tile);
        }
        tiles.sort();
        Self {
            meld_type,
            tile,
            tiles,
            from,
        }
    }

    // 暗槓以外は門前が崩れる
    #[inline]
    pub fn is_open(&self) -> bool {
        self.meld_type != MeldType::Ankan
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.tiles.iter().map(|t| t.to_string()).collect();
        write!(f, "{}({})", s.join("|"), self.from)
    }
}

#[test]
fn test_meld_new() {
    let m = Meld::new(MeldType::Chi, Tile(TM, 4), &[Tile(TM, 5), Tile(TM, 3)], House::N);
    assert_eq!(m.tiles, vec![Tile(TM, 3), Tile(TM, 4), Tile(TM, 5)]);
    assert!(m.is_open());

    let m = Meld::new(MeldType::Ankan, Tile(TZ, DW), &[Tile(TZ, DW); 4], House::E);
    assert_eq!(m.tiles.len(), 4);
    assert!(!m.is_open());
    assert_eq!(m.to_string(), "z5|z5|z5|z5(e)");
}
