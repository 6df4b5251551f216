//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 30-39   | match            | Name-matching codes                      |
//! | 40-49   | analyze          | Value/statistics codes                   |
//! | 50-59   | fetch            | External data source connectors          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Match (30-39)
// =============================================================================

/// Match config failed to parse or validate.
pub const EXIT_MATCH_INVALID_CONFIG: u8 = 30;

/// The run produced zero accepted matches.
/// Like `grep(1)` finding nothing: the tool worked, the data didn't.
pub const EXIT_MATCH_EMPTY: u8 = 31;

/// Runtime failure (unreadable input, bad CSV, write error).
pub const EXIT_MATCH_RUNTIME: u8 = 32;

// =============================================================================
// Analyze (40-49)
// =============================================================================

/// Input table is structurally invalid (missing columns, bad numbers).
pub const EXIT_ANALYZE_INPUT: u8 = 40;

/// Weights failed validation.
pub const EXIT_ANALYZE_WEIGHTS: u8 = 41;

/// Runtime failure (unreadable input, write error).
pub const EXIT_ANALYZE_RUNTIME: u8 = 42;

// =============================================================================
// Fetch / adapter (50-59) — external data source connectors
// =============================================================================

/// No API key provided (neither flag nor env var).
pub const EXIT_FETCH_NOT_AUTH: u8 = 50;

/// Auth rejected by upstream (401/403).
pub const EXIT_FETCH_AUTH: u8 = 51;

/// Bad request rejected by upstream (400).
pub const EXIT_FETCH_VALIDATION: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_FETCH_RATE_LIMIT: u8 = 53;

/// Upstream error (5xx) or network failure after retries.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;
