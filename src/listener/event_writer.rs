use serde_json::{json, Value};

use super::Listener;
use crate::errors::ReplicaError;
use crate::model::*;
use crate::util::misc::*;

use crate::error;

// [EventWriter]
// 適用したイベントと遷移後の状態の要約を記録する
// 出力先が指定されている場合は和了・desync時にファイルに書き出す
#[derive(Debug, Default)]
pub struct EventWriter {
    file_path: Option<String>,
    step: usize,
    record: Vec<Value>,
}

impl EventWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file_path: &str) -> Self {
        Self {
            file_path: Some(file_path.to_string()),
            ..Self::default()
        }
    }

    pub fn record(&self) -> &[Value] {
        &self.record
    }

    pub fn write(&self) -> Res {
        if let Some(path) = &self.file_path {
            write_to_file(path, &serde_json::to_string_pretty(&self.record)?)?;
        }
        Ok(())
    }

    fn flush(&self) {
        if let Err(e) = self.write() {
            error!("failed to write event log: {}", e);
        }
    }
}

impl Listener for EventWriter {
    fn notify_event(&mut self, state: &RoundState, event: &Event) {
        self.record.push(json!({
            "step": self.step,
            "event": event,
            "turn": state.turn,
            "tiles_count": state.tiles_count,
            "pending_discard": state.pending_discard,
            "calls": state.calls,
            "points": state.points,
        }));
        self.step += 1;
    }

    fn notify_result(&mut self, _state: &RoundState, result: &WinResult) {
        self.record.push(json!({ "result": result }));
        self.flush();
    }

    fn notify_desync(&mut self, _state: &RoundState, event: &Event, error: &ReplicaError) {
        self.record.push(json!({
            "step": self.step,
            "event": event,
            "desync": error.to_string(),
        }));
        self.flush();
    }
}

#[test]
fn test_event_writer_record() {
    let init = RoundInit {
        user_houses: House::ALL,
        round: House::E,
        kyoku: 1,
        tiles_count: 70,
        dora_indicators: vec![],
        hand_tiles: vec![],
        hand_counts: Houses::new(0, 13, 13, 13),
        points: Houses::new(25000, 25000, 25000, 25000),
    };
    let mut state = RoundState::new(House::E, init);
    state.turn = Some(House::S);

    let mut w = EventWriter::new();
    w.notify_event(&state, &Event::deal(House::S, None));
    w.notify_event(&state, &Event::nop());
    let r = w.record();
    assert_eq!(r.len(), 2);
    assert_eq!(r[0]["step"], 0);
    assert_eq!(r[0]["event"]["type"], "Deal");
    assert_eq!(r[0]["turn"], "s");
    assert_eq!(r[1]["points"]["n"], 25000);
    assert!(w.write().is_ok()); // 出力先なし
}
