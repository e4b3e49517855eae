// src/readers/mod.rs

//! "Readers" for _chrlib_.
//!
//! ## Overview of readers
//!
//! * A [`QueryEngine`] parses a query and drives a [`WindowScanner`].
//! * A `WindowScanner` drives a [`LogStore`] to read [`LogLine`s], and a
//!   [`LineClassifier`] to derive [`Event`s].
//! * A `LogStore` lists and reads the day files of one room.
//!
//! <br/>
//!
//! Also see [_Definitions of data_].
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [_Definitions of data_]: crate::data
//! [`Read`]: std::io::Read
//! [`LogLine`s]: crate::data::line::LogLine
//! [`Event`s]: crate::data::event::Event
//! [`LineClassifier`]: crate::readers::classifier::LineClassifier
//! [`LogStore`]: crate::readers::logstore::LogStore
//! [`WindowScanner`]: crate::readers::windowscanner::WindowScanner
//! [`QueryEngine`]: crate::readers::queryengine::QueryEngine

pub mod classifier;
pub mod helpers;
pub mod logstore;
pub mod queryengine;
pub mod summary;
pub mod windowscanner;
