use crate::model::*;
use crate::util::misc::Res;

// "m123p456z11" 形式の文字列を牌のリストに変換
pub fn tiles_from_string(exp: &str) -> Res<Vec<Tile>> {
    let mut tiles = vec![];
    let mut ti = None;
    for c in exp.chars() {
        match c {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(c)?),
            '1'..='9' => {
                let ti = ti.ok_or("tile number before tile type")?;
                let ni = c as usize - '0' as usize;
                if ti == TZ && ni > DR {
                    return Err(format!("invalid honor tile: z{}", ni).into());
                }
                tiles.push(Tile(ti, ni));
            }
            _ => return Err(format!("invalid char: '{}'", c).into()),
        }
    }
    Ok(tiles)
}

// 牌のリストを "m123p456z11" 形式の文字列に変換 (ソートして同種をまとめる)
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut tiles = tiles.to_vec();
    tiles.sort();

    let mut res = String::new();
    let mut last_ti = None;
    for t in tiles {
        if last_ti != Some(t.0) {
            res.push(tile_type_to_char(t.0));
            last_ti = Some(t.0);
        }
        res.push_str(&t.1.to_string());
    }
    res
}

// "pon:z7", "chi:m345", "minkan:p1", "ankan:s9", "kakan:z5" 形式の副露
// 鳴いた相手は点数計算に関係ないのでownerの上家で固定
pub fn meld_from_string(exp: &str, owner: House) -> Res<Meld> {
    let (tp, tiles) = exp
        .split_once(':')
        .ok_or_else(|| format!("invalid meld: '{}'", exp))?;
    let tiles = tiles_from_string(tiles)?;
    let from = owner.prev();

    let meld_type = match tp {
        "pon" => MeldType::Pon,
        "chi" => MeldType::Chi,
        "minkan" => MeldType::Minkan,
        "ankan" => MeldType::Ankan,
        "kakan" => MeldType::Kakan,
        _ => return Err(format!("invalid meld type: '{}'", tp).into()),
    };

    let meld = match meld_type {
        MeldType::Chi => {
            let mut tiles = tiles;
            tiles.sort();
            let ok = tiles.len() == 3
                && tiles[0].is_suit()
                && tiles[0].0 == tiles[2].0
                && tiles[1] == Tile(tiles[0].0, tiles[0].1 + 1)
                && tiles[2] == Tile(tiles[0].0, tiles[0].1 + 2);
            if !ok {
                return Err(format!("invalid chi: '{}'", exp).into());
            }
            Meld::new(meld_type, tiles[0], &tiles[1..], from)
        }
        _ => {
            if tiles.len() != 1 {
                return Err(format!("specify a single tile: '{}'", exp).into());
            }
            let t = tiles[0];
            match meld_type {
                MeldType::Pon => Meld::new(meld_type, t, &[t; 2], from),
                MeldType::Ankan => Meld::new(meld_type, t, &[t; 4], owner),
                _ => Meld::new(meld_type, t, &[t; 3], from),
            }
        }
    };

    Ok(meld)
}

#[test]
fn test_tiles_string() {
    let tiles = tiles_from_string("m123p45z17").unwrap();
    assert_eq!(tiles.len(), 7);
    assert_eq!(tiles[3], Tile(TP, 4));
    assert_eq!(tiles_to_string(&tiles), "m123p45z17");
    assert_eq!(tiles_to_string(&[Tile(TZ, 1), Tile(TM, 9), Tile(TM, 1)]), "m19z1");

    assert!(tiles_from_string("1m").is_err());
    assert!(tiles_from_string("z8").is_err());
    assert!(tiles_from_string("m0").is_err());
}

#[test]
fn test_meld_from_string() {
    let m = meld_from_string("chi:m534", House::S).unwrap();
    assert_eq!(m.meld_type, MeldType::Chi);
    assert_eq!(m.tiles, tiles_from_string("m345").unwrap());
    assert_eq!(m.from, House::E);

    let m = meld_from_string("ankan:z5", House::W).unwrap();
    assert_eq!(m.tiles.len(), 4);
    assert!(!m.is_open());

    assert!(meld_from_string("chi:m124", House::S).is_err());
    assert!(meld_from_string("pon:m11", House::S).is_err());
    assert!(meld_from_string("xxx:m1", House::S).is_err());
}
