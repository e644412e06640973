//! # API Route Modules
//!
//! Each module builds a `Router<AppState>` merged in `lib.rs`:
//! - [`domains`]: lifecycle operations (initialize, state, history, transition)

pub mod domains;
