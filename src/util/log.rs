use std::sync::atomic::{AtomicUsize, Ordering};

// ログレベル (値が小さいほど重要)
pub const LEVEL_ERROR: usize = 0;
pub const LEVEL_WARN: usize = 1;
pub const LEVEL_INFO: usize = 2;
pub const LEVEL_DEBUG: usize = 3;

static LEVEL: AtomicUsize = AtomicUsize::new(LEVEL_INFO);

pub fn set_level(level: usize) {
    LEVEL.store(level, Ordering::Relaxed);
}

#[inline]
pub fn enabled(level: usize) -> bool {
    level <= LEVEL.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! log_with_level {
    ($level:expr, $tag:expr, $($arg:tt)*) => {
        if $crate::util::log::enabled($level) {
            eprintln!(
                "[{}]({}:{}) {}",
                $tag,
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log_with_level!($crate::util::log::LEVEL_ERROR, "ERROR", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log_with_level!($crate::util::log::LEVEL_WARN, "WARN", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log_with_level!($crate::util::log::LEVEL_INFO, "INFO", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log_with_level!($crate::util::log::LEVEL_DEBUG, "DEBUG", $($arg)*)
    };
}

#[test]
fn test_level() {
    set_level(LEVEL_WARN);
    assert!(enabled(LEVEL_ERROR));
    assert!(enabled(LEVEL_WARN));
    assert!(!enabled(LEVEL_DEBUG));
    set_level(LEVEL_INFO);
}
