use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YakuResult {
    pub name: String,
    pub fan: usize,
}

// 和了1件分の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KyokuResult {
    pub yakus: Vec<YakuResult>,    // 成立した役 (ドラは含まない)
    pub dora_count: usize,         // ドラの枚数
    pub point_deltas: Houses<Point>, // 点数の増減 (合計は常に0)
}

impl KyokuResult {
    pub fn fan(&self) -> usize {
        self.yakus.iter().map(|y| y.fan).sum::<usize>() + self.dora_count
    }
}

impl fmt::Display for KyokuResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in &self.yakus {
            writeln!(f, "{}: {}", y.name, y.fan)?;
        }
        writeln!(f, "dora: {}", self.dora_count)?;
        write!(f, "deltas:")?;
        for (h, p) in self.point_deltas.iter() {
            write!(f, " {}:{:+}", h, p)?;
        }
        Ok(())
    }
}

// 和了イベントの処理結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result")]
pub enum WinResult {
    Tsumo(KyokuResult),
    Ron(Houses<Option<KyokuResult>>), // ロンしていない家はNone
}

impl WinResult {
    // 全和了の点数増減の合計
    pub fn point_deltas(&self) -> Houses<Point> {
        match self {
            WinResult::Tsumo(r) => r.point_deltas.clone(),
            WinResult::Ron(rs) => {
                let mut deltas = Houses::default();
                for (_, r) in rs.iter() {
                    if let Some(r) = r {
                        for h in House::ALL {
                            deltas[h] += r.point_deltas[h];
                        }
                    }
                }
                deltas
            }
        }
    }
}
