//! HTTP handlers and server-rendered pages for the flight board.

pub mod handlers;
pub mod pages;
