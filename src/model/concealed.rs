use super::*;

// 副露を含まない手牌
// 自分の手牌は牌の値を持ち, 他家の手牌は枚数のみを持つ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Hand {
    Shown(Vec<Tile>),
    Hidden(usize),
}

impl Default for Hand {
    fn default() -> Self {
        Hand::Hidden(0)
    }
}

impl Hand {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Hand::Shown(tiles) => tiles.len(),
            Hand::Hidden(n) => *n,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tiles(&self) -> Option<&[Tile]> {
        match self {
            Hand::Shown(tiles) => Some(tiles),
            Hand::Hidden(_) => None,
        }
    }

    // 指定した牌の所持枚数 (他家の場合は不明なのでNone)
    pub fn count(&self, tile: Tile) -> Option<usize> {
        self.tiles().map(|tiles| vec_count(tiles, &tile))
    }

    // Hiddenの場合はtileを無視して枚数のみ加算
    pub fn push(&mut self, tile: Tile) {
        match self {
            Hand::Shown(tiles) => tiles.push(tile),
            Hand::Hidden(n) => *n += 1,
        }
    }

    pub fn push_hidden(&mut self) {
        if let Hand::Hidden(n) = self {
            *n += 1;
        }
    }

    // 手牌から牌をn枚取り除く Shownは値で, Hiddenは枚数で判定
    // 取り除けない場合は何も変更せずにfalseを返却
    pub fn remove(&mut self, tile: Tile, n: usize) -> bool {
        match self {
            Hand::Shown(tiles) => vec_remove_n(tiles, &tile, n),
            Hand::Hidden(cnt) => {
                if *cnt < n {
                    return false;
                }
                *cnt -= n;
                true
            }
        }
    }

    // 複数の異なる牌をまとめて取り除く (チー用)
    pub fn remove_all(&mut self, tiles: &[Tile]) -> bool {
        match self {
            Hand::Shown(hand) => {
                let mut h = hand.clone();
                for t in tiles {
                    if !vec_remove_n(&mut h, t, 1) {
                        return false;
                    }
                }
                *hand = h;
                true
            }
            Hand::Hidden(cnt) => {
                if *cnt < tiles.len() {
                    return false;
                }
                *cnt -= tiles.len();
                true
            }
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Shown(tiles) => {
                let mut tiles = tiles.clone();
                tiles.sort();
                write!(f, "{}", vec_to_string(&tiles))
            }
            Hand::Hidden(n) => write!(f, "[?; {}]", n),
        }
    }
}

#[test]
fn test_hand_remove() {
    let mut h = Hand::Shown(vec![Tile(TM, 1), Tile(TM, 1), Tile(TP, 2)]);
    assert!(!h.remove(Tile(TP, 2), 2));
    assert_eq!(h.len(), 3);
    assert!(h.remove(Tile(TM, 1), 2));
    assert_eq!(h.tiles(), Some(&[Tile(TP, 2)][..]));

    let mut h = Hand::Hidden(2);
    assert!(h.remove(Tile(TZ, 1), 2));
    assert!(!h.remove(Tile(TZ, 1), 1));
    assert_eq!(h.count(Tile(TZ, 1)), None);
}

#[test]
fn test_hand_remove_all() {
    let mut h = Hand::Shown(vec![Tile(TS, 3), Tile(TS, 5), Tile(TZ, 1)]);
    assert!(!h.remove_all(&[Tile(TS, 3), Tile(TS, 4)]));
    assert_eq!(h.len(), 3);
    assert!(h.remove_all(&[Tile(TS, 3), Tile(TS, 5)]));
    assert_eq!(h.len(), 1);
}
