// src/debug/printers.rs

//! Printing macros for user-facing and debug-build diagnostics, and helpers
//! for readable debug output of log text.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! an `err`or
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("ERROR: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_err;

/// `d`ebug `e`println! an `warn`ing
#[macro_export]
macro_rules! de_wrn {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("WARNING: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_wrn;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `warn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions - debug representations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn passed char into a pictoral representation if it is a control
/// code, e.g. `'\x03'` returns `'␃'`.
///
/// Chat logs carry in-band styling codes (bold `\x02`, color `\x03`, …).
/// This keeps the printing width of each to 1 so humans can visually review
/// debug output.
pub const fn char_to_char_noraw(c: char) -> char {
    // https://en.wikipedia.org/wiki/C0_and_C1_control_codes#C0_controls
    match c as u32 {
        0 => '␀',
        1 => '␁',
        2 => '␂',
        3 => '␃',
        4 => '␄',
        5 => '␅',
        6 => '␆',
        7 => '␇',
        8 => '␈',
        9 => '␉',
        10 => '␊',
        11 => '␋',
        12 => '␌',
        13 => '␍',
        14 => '␎',
        15 => '␏',
        16 => '␐',
        17 => '␑',
        18 => '␒',
        19 => '␓',
        20 => '␔',
        21 => '␕',
        22 => '␖',
        23 => '␗',
        24 => '␘',
        25 => '␙',
        26 => '␚',
        27 => '␛',
        28 => '␜',
        29 => '␝',
        30 => '␞',
        31 => '␟',
        127 => '␡',
        _ => c,
    }
}

/// Transform a `str` to a non-raw `String` version.
///
/// only intended for debugging
#[doc(hidden)]
#[allow(non_snake_case)]
pub fn str_to_String_noraw(str_buf: &str) -> String {
    str_buf.chars().map(char_to_char_noraw).collect()
}
