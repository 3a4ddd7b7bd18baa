//! HTTP handlers for the Posts domain

pub mod posts;
