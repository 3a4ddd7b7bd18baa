//! Domain types for posts

pub mod entities;
