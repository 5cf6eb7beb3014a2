use serde::{de, ser};

use super::*;
use crate::util::misc::Res;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

impl Tile {
    pub fn from_symbol(s: &str) -> Res<Self> {
        let mut chars = s.chars();
        let (c0, c1) = match (chars.next(), chars.next(), chars.next()) {
            (Some(c0), Some(c1), None) => (c0, c1),
            _ => return Err(format!("invalid tile symbol: '{}'", s).into()),
        };
        let ti = tile_type_from_char(c0)?;
        let ni = c1
            .to_digit(10)
            .ok_or_else(|| format!("invalid tile number: '{}'", s))? as Tnum;
        let max = if ti == TZ { DR } else { 9 };
        if ni == 0 || ni > max {
            return Err(format!("tile number out of range: '{}'", s).into());
        }
        Ok(Self(ti, ni))
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_honor(&self) -> bool {
        self.0 == TZ
    }

    // 1,9牌
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.0 != TZ && (self.1 == 1 || self.1 == 9)
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 風牌
    #[inline]
    pub fn is_wind(&self) -> bool {
        self.0 == TZ && self.1 <= WN
    }

    // 三元牌
    #[inline]
    pub fn is_dragon(&self) -> bool {
        self.0 == TZ && DW <= self.1 && self.1 <= DR
    }

    // ドラ表示牌に対するドラ (9の次は1, 北の次は東, 中の次は白)
    pub fn next_dora(&self) -> Self {
        let ni = if self.is_honor() {
            match self.1 {
                WN => WE,
                DR => DW,
                i => i + 1,
            }
        } else {
            match self.1 {
                9 => 1,
                i => i + 1,
            }
        };
        Self(self.0, ni)
    }

    // 全34種の牌
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..TYPE).flat_map(|ti| {
            let max = if ti == TZ { DR } else { 9 };
            (1..=max).map(move |ni| Tile(ti, ni))
        })
    }
}

pub fn tile_type_from_char(ch: char) -> Res<Type> {
    match ch {
        'm' => Ok(TM),
        'p' => Ok(TP),
        's' => Ok(TS),
        'z' => Ok(TZ),
        _ => Err(format!("invalid tile type char: {}", ch).into()),
    }
}

pub fn tile_type_to_char(ti: Type) -> char {
    ['m', 'p', 's', 'z'][ti]
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", tile_type_to_char(self.0), self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [TileTable]
// 牌種別x数字の枚数表 ([_][0]は未使用)
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for t in tiles {
        tt[t.0][t.1] += 1;
    }
    tt
}

#[test]
fn test_tile_symbol() {
    assert_eq!(Tile::from_symbol("m1").unwrap(), Tile(TM, 1));
    assert_eq!(Tile::from_symbol("z7").unwrap(), Tile(TZ, DR));
    assert!(Tile::from_symbol("z8").is_err());
    assert!(Tile::from_symbol("m0").is_err());
    assert!(Tile::from_symbol("x1").is_err());
    assert!(Tile::from_symbol("m12").is_err());
    assert_eq!(Tile(TS, 5).to_string(), "s5");
}

#[test]
fn test_next_dora() {
    assert_eq!(Tile(TM, 1).next_dora(), Tile(TM, 2));
    assert_eq!(Tile(TP, 9).next_dora(), Tile(TP, 1));
    assert_eq!(Tile(TZ, WN).next_dora(), Tile(TZ, WE));
    assert_eq!(Tile(TZ, WW).next_dora(), Tile(TZ, WN));
    assert_eq!(Tile(TZ, DR).next_dora(), Tile(TZ, DW));
    assert_eq!(Tile(TZ, DW).next_dora(), Tile(TZ, DG));
}

#[test]
fn test_tile_catalog() {
    assert_eq!(Tile::all().count(), 34);
    for t in Tile::all() {
        assert_eq!(Tile::from_symbol(&t.to_string()).unwrap(), t);
    }
}

#[test]
fn test_tile_serde() {
    let t: Tile = serde_json::from_str("\"p3\"").unwrap();
    assert_eq!(t, Tile(TP, 3));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"p3\"");
    assert!(serde_json::from_str::<Tile>("\"p\"").is_err());
}
