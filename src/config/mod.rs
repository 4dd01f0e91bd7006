//! Static tables the scenes read at creation time.
//! - constants : design space, timings, effect tuning
//! - layout    : widget positions in the 540x960 design space
//! - manifest  : asset + character tables fetched before any scene runs
pub mod constants;
pub mod layout;
pub mod manifest;
