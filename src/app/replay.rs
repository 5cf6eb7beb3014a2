use serde::{Deserialize, Serialize};

use crate::control::PlayerEngine;
use crate::listener::{EventPrinter, EventWriter, Listener};
use crate::model::*;
use crate::util::log;
use crate::util::misc::*;

use crate::{error, info};

// イベントログ
// userは視点となるユーザ番号 (init.user_housesの添字)
#[derive(Debug, Serialize, Deserialize)]
pub struct Record {
    pub user: Seat,
    pub init: RoundInit,
    #[serde(default)]
    pub rule: Rule,
    pub events: Vec<Event>,
}

#[derive(Debug)]
pub struct ReplayApp {
    file_path: String,
    write_path: String,
    rule_path: String,
    debug: bool,
    quiet: bool,
}

impl ReplayApp {
    pub fn new(args: Vec<String>) -> Self {
        use std::process::exit;

        let mut app = Self {
            file_path: String::new(),
            write_path: String::new(),
            rule_path: String::new(),
            debug: false,
            quiet: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => app.file_path = next_value(&mut it, s),
                "-w" => app.write_path = next_value(&mut it, s),
                "-r" => app.rule_path = next_value(&mut it, s),
                "-d" => app.debug = true,
                "-q" => app.quiet = true,
                opt => {
                    error!("unknown option: {}", opt);
                    print_usage();
                    exit(0);
                }
            }
        }

        if app.file_path.is_empty() {
            error!("file(-f) not specified");
            print_usage();
            exit(0);
        }

        app
    }

    pub fn run(&mut self) {
        if self.debug {
            log::set_level(log::LEVEL_DEBUG);
        }

        let contents = std::fs::read_to_string(&self.file_path).unwrap_or_else(error_exit);
        let mut record: Record = serde_json::from_str(&contents).unwrap_or_else(error_exit);
        if !self.rule_path.is_empty() {
            // ルールファイルの指定はイベントログ内のルールより優先
            record.rule = Rule::from_file(&self.rule_path).unwrap_or_else(error_exit);
        }

        let mut listeners: Vec<Box<dyn Listener>> = vec![];
        if !self.quiet {
            listeners.push(Box::new(EventPrinter::new(self.debug)));
        }
        if !self.write_path.is_empty() {
            listeners.push(Box::new(EventWriter::with_file(&self.write_path)));
        }

        match replay(record, listeners) {
            Ok(points) => info!("final points: {:?}", points),
            Err(e) => error!("{}", e),
        }
    }
}

// 記録されたイベントをすべて適用し, 最終的な持ち点を返却
// 和了の評価失敗はログに残して続行し, desyncの時点で中断する
pub fn replay(record: Record, listeners: Vec<Box<dyn Listener>>) -> Res<Houses<Score>> {
    let mut engine = PlayerEngine::new(record.user, record.init, record.rule, listeners)?;
    for (i, e) in record.events.iter().enumerate() {
        if let Err(err) = engine.handle_event(e) {
            if engine.is_desynced() {
                return Err(format!("event {}: {}", i, err).into());
            }
        }
    }
    Ok(engine.state().points.clone())
}

fn print_usage() {
    error!(
        r"Usage
    $ cargo run R -f FILE [-d] [-q] [-w OUTPUT] [-r RULE]
Options
    -f: event log (json)
    -d: print debug log and round state
    -q: do not print events
    -w: write the structured event log to OUTPUT
    -r: rule file (json), overrides the rule in the event log
"
    );
}

#[test]
fn test_replay_record() {
    let json = r#"{
        "user": 0,
        "init": {
            "user_houses": ["e", "s", "w", "n"],
            "round": "e",
            "kyoku": 1,
            "tiles_count": 70,
            "dora_indicators": ["z4"],
            "hand_tiles": ["m1","m2","m3","m4","m5","m6","m7","m8","m9","p1","p1","z1","z1"],
            "hand_counts": {"e": 13, "s": 13, "w": 13, "n": 13},
            "points": {"e": 25000, "s": 25000, "w": 25000, "n": 25000}
        },
        "events": [
            {"type": "Deal", "house": "e", "tile": "z7"},
            {"type": "Discard", "house": "e", "tile": "z7", "riichi": true},
            {"type": "Deal", "house": "s"},
            {"type": "Discard", "house": "s", "tile": "z1"},
            {"type": "RonWin", "callers": ["e"], "callee": "s", "hand_tiles": {
                "e": ["m1","m2","m3","m4","m5","m6","m7","m8","m9","p1","p1","z1","z1"],
                "s": [], "w": [], "n": []
            }}
        ]
    }"#;
    let record: Record = serde_json::from_str(json).unwrap();
    assert_eq!(record.rule, Rule::default());

    // リーチ(1) + 一気通貫(2) + 場風(1) + 自風(1) + ドラ2 (ロン牌を除く) = 7翻 親跳満
    let points = replay(record, vec![]).unwrap();
    assert_eq!(points, Houses::new(43000, 7000, 25000, 25000));
    assert_eq!(points.sum(), 100000);
}
