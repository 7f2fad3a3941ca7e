//! Entry point for the unit test harness under `tests/unit/`.

#![cfg(feature = "std")]

mod unit;
