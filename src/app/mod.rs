// mainから直接呼び出すアプリケーションの動作モード(C, R)のモジュール

mod calculator;
mod replay;

pub use calculator::CalculatorApp;
pub use replay::{replay, Record, ReplayApp};
