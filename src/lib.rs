//! studyaid library
//!
//! A terminal client for an AI study-aid backend: notes, flashcards and
//! quizzes generated from the user's material, with a local cache that keeps
//! notes and flashcards available when the backend is down.

pub mod app;
pub mod cache;
pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod data;
pub mod export;
pub mod fallback;
pub mod features;
pub mod logging;
pub mod ui;
pub mod worker;
