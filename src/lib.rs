//! Descriptive statistics over small labelled tables, plus the notebook
//! that walks through them cell by cell.

pub mod app;
pub mod cells;
pub mod cli;
pub mod data;
pub mod error;
pub mod render;
pub mod state;
