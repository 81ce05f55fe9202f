//! # Taskboard
//!
//! A terminal client for a task-management REST backend. Taskboard fetches
//! categories and tasks, shows them as a list, a card grid or a monthly
//! calendar, and edits them through dialogs in the TUI or one-shot CLI
//! commands.
//!
//! ## Features
//!
//! *   **Three views**: list table, cards and a Monday-first month calendar.
//! *   **Filtering**: free-text search, active category, date range, priority,
//!     project, owner, undated and overdue tasks. All filters combine with AND.
//! *   **Dual Interface**:
//!     *   **CLI**: scriptable commands printing tables.
//!     *   **TUI**: keyboard and mouse driven dashboard.
//! *   **Always fresh**: every write is followed by a full reload from the backend.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive mode
//! taskboard
//!
//! # Tasks due this month, as a calendar
//! taskboard list --view calendar
//!
//! # Add and filter
//! taskboard add "Ship release" --project Web --priority high --date 2024-03-20
//! taskboard list --project web --from 2024-03-01 --to 2024-03-31
//!
//! # Categories
//! taskboard category add Work --color "#3366ff"
//! taskboard category list
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit, `Tab`: Switch between categories and tasks, `/`: Search
//! *   `1`/`2`/`3`: List, Cards, Calendar
//! *   `a`: New task, `A`: New category, `f`: Filter
//! *   `e`/`Enter`: Edit, `d`: Delete
//! *   Calendar: arrows move the day, `[`/`]` change month, `t` jumps to today,
//!     `Enter` adds a task on the highlighted day
//!
//! ## Configuration
//!
//! `~/.config/taskboard/config.toml` (or `TASKBOARD_CONFIG`):
//!
//! ```toml
//! api_url = "http://127.0.0.1:8000"
//! default_view = "calendar"
//! ```
//!
//! The backend URL can also be set with `TASKBOARD_API` or `--api`.
//! Log verbosity is read from `TASKBOARD_LOG`.

pub mod action;
pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod logging;
pub mod modal;
pub mod models;
pub mod state;
pub mod store;
pub mod tui;
pub mod view;
