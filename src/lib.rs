// Comment scanner: toxicity classification for user comments.
//
// This is the library root. The binary in main.rs wires these modules into
// a CLI and an HTTP server.

pub mod config;
pub mod output;
pub mod text;
pub mod toxicity;
pub mod web;
