//! CLI Exit Code Registry
//!
//! Single source of truth for every exit code `vaultclean` returns.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success (including `--dry-run`)                 |
//! | 1    | General error (unspecified)                     |
//! | 2    | Usage error (bad arguments; emitted by clap)    |
//! | 3    | An input export could not be read               |
//! | 4    | An input export is not a valid vault document   |
//! | 5    | Config file unreadable or invalid               |
//! | 6    | Cleaned export could not be written             |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant error path

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own parse failures.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Input file missing or unreadable.
pub const EXIT_INPUT_READ: u8 = 3;

/// Input file is not JSON, or not shaped like a vault export.
pub const EXIT_INPUT_PARSE: u8 = 4;

/// Config file unreadable, unparsable, or failing validation.
pub const EXIT_CONFIG: u8 = 5;

/// Output file could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 6;
