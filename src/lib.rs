//! Infinite-scroll catalog viewer for the PokeAPI creature listing.
//!
//! The pagination core is [`controller::Controller`], fed by
//! [`fetcher::PageFetcher`] and driven by [`trigger::ScrollTrigger`]; the
//! terminal UI in [`app`] and [`ui`] is one consumer of it.

pub mod action;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod fetcher;
pub mod grid;
pub mod pokeapi;
pub mod trigger;
pub mod tui;
pub mod types;
pub mod ui;
