//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                       |
//! |------|-----------------------------------------------|
//! | 0    | Success                                       |
//! | 1    | General error (store unreadable, write failed)|
//! | 2    | Usage error (bad kind, unparsable value)      |
//! | 3    | Key absent, or stored under a different kind  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - the store could not be read or written.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or a value that does not parse as its kind.
pub const EXIT_USAGE: u8 = 2;

/// `read` found nothing for the key (never written, removed, or a different
/// kind than `--kind` asked for).
pub const EXIT_ABSENT: u8 = 3;
