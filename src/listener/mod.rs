mod event_printer;
mod event_writer;

use std::fmt;

use crate::errors::ReplicaError;
use crate::model::*;

pub use event_printer::EventPrinter;
pub use event_writer::EventWriter;

// レプリカの状態遷移を外部に通知する (ログ出力など)
// 通知はすべて状態更新後に行われる
pub trait Listener: Send {
    fn notify_event(&mut self, _state: &RoundState, _event: &Event) {}
    fn notify_result(&mut self, _state: &RoundState, _result: &WinResult) {}
    fn notify_desync(&mut self, _state: &RoundState, _event: &Event, _error: &ReplicaError) {}
}

impl fmt::Debug for dyn Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener")
    }
}
