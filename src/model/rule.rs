use super::*;
use crate::util::misc::Res;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub riichi_min_score: Score,   // リーチ宣言に必要な持ち点
    pub riichi_blocks_calls: bool, // リーチ後はポン・チー・カンの可否を計算しない
    pub chi_eligibility: bool,     // チーの可否を計算する
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            riichi_min_score: 1000,
            riichi_blocks_calls: true,
            chi_eligibility: true,
        }
    }
}

impl Rule {
    pub fn from_file(file_path: &str) -> Res<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[test]
fn test_rule_default_fields() {
    let r: Rule = serde_json::from_str(r#"{"chi_eligibility": false}"#).unwrap();
    assert_eq!(r.riichi_min_score, 1000);
    assert!(r.riichi_blocks_calls);
    assert!(!r.chi_eligibility);
}

#[test]
fn test_rule_from_file() {
    let path = std::env::temp_dir().join("mahjong_replica_rule.json");
    std::fs::write(&path, r#"{"riichi_min_score": 0, "riichi_blocks_calls": false}"#).unwrap();
    let r = Rule::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(r.riichi_min_score, 0);
    assert!(!r.riichi_blocks_calls);
    assert!(r.chi_eligibility);

    assert!(Rule::from_file("no_such_rule.json").is_err());
}
