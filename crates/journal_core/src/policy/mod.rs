//! Access rules shared by list queries and single-entry views.

pub mod visibility;
