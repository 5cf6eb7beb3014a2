// 構造的な意味合いや一貫性を保つために以下の警告は無効化
#![allow(clippy::needless_range_loop)]
#![allow(clippy::single_match)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod control;
pub mod errors;
pub mod hand;
pub mod listener;
pub mod model;
pub mod util;
