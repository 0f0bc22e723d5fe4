//! Server-rendered pages.
//!
//! Plain HTML forms posting back to the app; every page shares one shell.
//!
//! # Structure
//!
//! - [`pages`]: shell, generator, login and registration pages

pub mod pages;
