// 手牌の役や点数計算を行うモジュール
mod evaluate;
mod parse;
mod point;
mod win;
mod yaku;

pub use self::{
    evaluate::{count_dora, evaluate_hand, WinContext},
    point::{fan_to_point, get_point_title, ron_point_deltas, tsumo_point_deltas},
    win::{
        calc_discards_to_tenpai, calc_tiles_to_win, is_chiitoitsu_win, is_kokushimusou_win,
        is_normal_win, is_win,
    },
    yaku::{Yaku, YAKU_LIST},
};
