// 麻雀のデータモデル
mod concealed;
mod define;
mod event;
mod house;
mod meld;
mod rule;
mod state;
mod tile;
mod win_result;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::misc::{vec_count, vec_remove_n, vec_to_string};

pub use self::{
    concealed::*, define::*, event::*, house::*, meld::*, rule::*, state::*, tile::*,
    win_result::*,
};
