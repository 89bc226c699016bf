//! Lendsqr admin dashboard data core
//!
//! A paged query engine over the user list plus a durable local cache of
//! opened users and their view metadata, with a command-line front end.

pub mod cli;
pub mod core;
pub mod entities;
