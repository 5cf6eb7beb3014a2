use std::ops::{Index, IndexMut};

use serde::{de, ser};

use super::*;

// 座席 (東南西北). 局の間は不変
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum House {
    E,
    S,
    W,
    N,
}

use House::*;

impl House {
    pub const ALL: [House; SEAT] = [E, S, W, N];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % SEAT]
    }

    // 下家 (この家の打牌をチーできる家)
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    // 上家
    #[inline]
    pub fn prev(self) -> Self {
        Self::from_index(self.index() + SEAT - 1)
    }

    // 風牌の数字 (WE | WS | WW | WN)
    #[inline]
    pub fn wind(self) -> Tnum {
        self.index() + 1
    }

    // 親は常に東家
    #[inline]
    pub fn is_dealer(self) -> bool {
        self == E
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'e' => Some(E),
            's' => Some(S),
            'w' => Some(W),
            'n' => Some(N),
            _ => None,
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ['e', 's', 'w', 'n'][self.index()])
    }
}

// [Houses]
// 4家分の値を必ずすべて保持するコンテナ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Houses<T>([T; SEAT]);

impl<T> Houses<T> {
    pub fn new(e: T, s: T, w: T, n: T) -> Self {
        Self([e, s, w, n])
    }

    pub fn from_fn(mut f: impl FnMut(House) -> T) -> Self {
        Self([f(E), f(S), f(W), f(N)])
    }

    pub fn iter(&self) -> impl Iterator<Item = (House, &T)> {
        House::ALL.into_iter().zip(self.0.iter())
    }
}

impl Houses<Point> {
    pub fn sum(&self) -> Point {
        self.0.iter().sum()
    }
}

impl<T> Index<House> for Houses<T> {
    type Output = T;

    #[inline]
    fn index(&self, h: House) -> &T {
        &self.0[h.index()]
    }
}

impl<T> IndexMut<House> for Houses<T> {
    #[inline]
    fn index_mut(&mut self, h: House) -> &mut T {
        &mut self.0[h.index()]
    }
}

impl<T: ser::Serialize> ser::Serialize for Houses<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        use ser::SerializeStruct;
        let mut st = serializer.serialize_struct("Houses", SEAT)?;
        st.serialize_field("e", &self[E])?;
        st.serialize_field("s", &self[S])?;
        st.serialize_field("w", &self[W])?;
        st.serialize_field("n", &self[N])?;
        st.end()
    }
}

// 欠けている家があればエラー
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HousesRepr<T> {
    e: T,
    s: T,
    w: T,
    n: T,
}

impl<'de, T: de::Deserialize<'de>> de::Deserialize<'de> for Houses<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let r = HousesRepr::<T>::deserialize(deserializer)?;
        Ok(Self::new(r.e, r.s, r.w, r.n))
    }
}

#[test]
fn test_house_order() {
    assert_eq!(E.next(), S);
    assert_eq!(N.next(), E);
    assert_eq!(E.prev(), N);
    assert_eq!(W.wind(), WW);
    assert!(E.is_dealer());
    assert!(!S.is_dealer());
}

#[test]
fn test_houses_serde() {
    let h = Houses::new(1, 2, 3, 4);
    let s = serde_json::to_string(&h).unwrap();
    assert_eq!(s, r#"{"e":1,"s":2,"w":3,"n":4}"#);
    let h2: Houses<i32> = serde_json::from_str(&s).unwrap();
    assert_eq!(h, h2);

    // 家が欠けている場合は失敗
    assert!(serde_json::from_str::<Houses<i32>>(r#"{"e":1,"s":2,"w":3}"#).is_err());
}

#[test]
fn test_houses_index() {
    let mut h = Houses::from_fn(|h| h.index() as i32 * 10);
    h[W] += 5;
    assert_eq!(h[W], 25);
    assert_eq!(h.sum(), 65);
    let v: Vec<House> = h.iter().map(|(h, _)| h).collect();
    assert_eq!(v, House::ALL.to_vec());
}
