//! API endpoint integration tests
//!
//! Tests for the post and user endpoints through the composed router, and
//! for the post client against a live server.

#![allow(dead_code)]

mod client;
mod common;
mod posts;
mod users;
