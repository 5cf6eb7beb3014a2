use crate::model::{House, Houses, Point};

fn ceil(n: Point) -> Point {
    (n + 99) / 100 * 100
}

// 翻数から和了点を返却 (符は計算しない)
// 親は1.5倍, 0翻は和了として成立しないのでNone
pub fn fan_to_point(fan: usize, is_dealer: bool) -> Option<Point> {
    let base = match fan {
        0 => return None,
        1 => 1000,
        2 => 2000,
        3 => 3900,
        4..=5 => 8000,   // 満貫
        6..=7 => 12000,  // 跳満
        8..=10 => 16000, // 倍満
        11..=12 => 24000, // 三倍満
        _ => 32000,      // 役満
    };
    Some(if is_dealer { base * 3 / 2 } else { base })
}

pub fn get_point_title(fan: usize) -> &'static str {
    match fan {
        4..=5 => "満貫",
        6..=7 => "跳満",
        8..=10 => "倍満",
        11..=12 => "三倍満",
        13.. => "役満",
        _ => "",
    }
}

// ツモ和了の点数移動
// 親の和了: 子3人がpoint/3ずつ支払い
// 子の和了: 親がpoint/2, 子がpoint/4ずつ支払い
// 和了者は支払いの合計を受け取るので合計は常に0
pub fn tsumo_point_deltas(winner: House, point: Point) -> Houses<Point> {
    let mut deltas = Houses::from_fn(|h| {
        if h == winner {
            0
        } else if winner.is_dealer() {
            -ceil(point / 3 + (point % 3 != 0) as Point)
        } else if h.is_dealer() {
            -ceil(point / 2 + (point % 2 != 0) as Point)
        } else {
            -ceil(point / 4 + (point % 4 != 0) as Point)
        }
    });
    deltas[winner] = -deltas.sum();
    deltas
}

// ロン和了の点数移動 (放銃者が全額支払い)
pub fn ron_point_deltas(winner: House, callee: House, point: Point) -> Houses<Point> {
    let mut deltas = Houses::default();
    deltas[winner] += point;
    deltas[callee] -= point;
    deltas
}

#[test]
fn test_fan_to_point() {
    assert_eq!(fan_to_point(0, false), None);
    assert_eq!(fan_to_point(0, true), None);
    assert_eq!(fan_to_point(1, false), Some(1000));
    assert_eq!(fan_to_point(3, false), Some(3900));
    assert_eq!(fan_to_point(3, true), Some(5850));
    assert_eq!(fan_to_point(5, false), Some(8000));
    assert_eq!(fan_to_point(7, true), Some(18000));
    assert_eq!(fan_to_point(10, false), Some(16000));
    assert_eq!(fan_to_point(12, false), Some(24000));
    assert_eq!(fan_to_point(26, true), Some(48000));
    assert_eq!(get_point_title(6), "跳満");
}

#[test]
fn test_tsumo_point_deltas() {
    // 子の和了: 親は子の倍を支払う
    let d = tsumo_point_deltas(House::S, 8000);
    assert_eq!(d, Houses::new(-4000, 8000, -2000, -2000));
    assert_eq!(d.sum(), 0);

    // 端数は100点単位で切り上げ
    let d = tsumo_point_deltas(House::W, 1000);
    assert_eq!(d, Houses::new(-500, -300, 1100, -300));
    assert_eq!(d.sum(), 0);

    // 親の和了: 全員同額
    let d = tsumo_point_deltas(House::E, 5850);
    assert_eq!(d, Houses::new(6000, -2000, -2000, -2000));
    assert_eq!(d.sum(), 0);
}

#[test]
fn test_ron_point_deltas() {
    let d = ron_point_deltas(House::N, House::E, 3900);
    assert_eq!(d, Houses::new(-3900, 0, 0, 3900));
    assert_eq!(d.sum(), 0);
}
