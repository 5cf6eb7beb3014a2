use super::Listener;
use crate::errors::ReplicaError;
use crate::model::*;

// [EventPrinter]
#[derive(Debug, Default)]
pub struct EventPrinter {
    step: usize,
    verbose: bool, // 毎イベント後に局の状態を出力
}

impl EventPrinter {
    pub fn new(verbose: bool) -> Self {
        Self { step: 0, verbose }
    }

    fn print_point_change(&self, state: &RoundState, deltas: &Houses<Point>) {
        for (h, &delta) in deltas.iter() {
            let new = state.points[h];
            let old = new - delta;
            println!("house {}: {} -> {} ({:+})", h, old, new, delta);
        }
    }
}

impl Listener for EventPrinter {
    fn notify_event(&mut self, state: &RoundState, event: &Event) {
        use Event::*;
        print!("(step:{}) ", self.step);
        match event {
            Deal(e) => match e.tile {
                Some(t) => println!("Deal {} {}", e.house, t),
                None => println!("Deal {}", e.house),
            },
            Discard(e) => {
                println!(
                    "Discard {} {}{}",
                    e.house,
                    e.tile,
                    if e.riichi { " riichi" } else { "" }
                );
            }
            Pon(e) => println!("Pon {} <- {}", e.caller, e.callee),
            Chi(e) => println!("Chi {} <- {} {}{}", e.caller, e.callee, e.consumed[0], e.consumed[1]),
            Minkan(e) => println!("Minkan {} <- {}", e.caller, e.callee),
            Ankan(e) => println!("Ankan {} {}", e.house, e.tile),
            Kakan(e) => println!("Kakan {} {}", e.house, e.tile),
            Dora(e) => println!("Dora {}", e.tile),
            TsumoWin(e) => println!("TsumoWin {} {}", e.house, e.tsumo_tile),
            RonWin(e) => {
                let callers: Vec<String> = e.callers.iter().map(|h| h.to_string()).collect();
                println!("RonWin {} <- {}", callers.join(","), e.callee);
            }
            Nop(_) => println!("Nop"),
        }
        if self.verbose {
            println!("{}", state);
        }
        self.step += 1;
    }

    fn notify_result(&mut self, state: &RoundState, result: &WinResult) {
        let print_result = |h: House, r: &KyokuResult| {
            println!("[{}] fan: {}", h, r.fan());
            println!("{}", r);
        };
        match result {
            WinResult::Tsumo(r) => {
                if let Some(h) = state.turn {
                    print_result(h, r);
                }
            }
            WinResult::Ron(rs) => {
                for (h, r) in rs.iter() {
                    if let Some(r) = r {
                        print_result(h, r);
                    }
                }
            }
        }
        self.print_point_change(state, &result.point_deltas());
        println!();
    }

    fn notify_desync(&mut self, state: &RoundState, event: &Event, error: &ReplicaError) {
        println!("(step:{}) {} rejected: {}", self.step, event.name(), error);
        println!("{}", state);
    }
}
