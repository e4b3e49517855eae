// src/printer/mod.rs

//! The `printer` module renders replayed history as wire lines
//! ([`EventFormatter`]), frames them ([`BatchEnvelope`]), and prints
//! responses with various text effects (color) to the destination chosen
//! per user ([`printers`]).
//!
//! [`EventFormatter`]: crate::printer::formatter::EventFormatter
//! [`BatchEnvelope`]: crate::printer::batch::BatchEnvelope
//! [`printers`]: crate::printer::printers

pub mod batch;
pub mod formatter;
pub mod printers;
