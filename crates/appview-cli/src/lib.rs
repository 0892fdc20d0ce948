//! Appview CLI library.
//!
//! Command implementations behind the `appview` binary: inspecting and
//! validating appearance documents, locating sprite indices, building
//! previews, recoloring outfits, playing animation loops and replacing
//! sprites.

pub mod commands;
