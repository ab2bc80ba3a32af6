/*!
# Org Chart

A live organisational chart served to the browser, built in Rust.

## Overview

The employee roster is maintained in a shared spreadsheet and published as
CSV. This crate polls that CSV on a fixed interval, rebuilds the reporting
hierarchy from the flat list of employee/manager pairs and serves it as an
expandable, colour-coded chart grouped by business line and role.

## Architecture

### Core (always built)
- **employee**: Roster records and their normalisation rules
- **salary**: Locale-aware salary coercion (`$ 1.234.567,89` → `1234567.89`)
  and display formatting
- **loader**: Quote-aware CSV parsing into a roster
- **hierarchy**: The tree builder (lines → role groups → reporting chains),
  with cycle and dangling-manager handling
- **expand**: Expand/collapse state keyed by node keys, kept across rebuilds
- **style**: Colour, border and icon lookup tables
- **view**: Render model flattening the visible part of the tree
- **config**: Server settings from flags and `ORGCHART_*` variables

### Web layer (`web` feature)
- **source**: Roster fetching over HTTP or from a local file
- **app**: Periodic refresh, shared snapshot and the axum routes

## Data Quality

Nothing in the roster is rejected. Unparsable salaries count as zero, a
manager code that matches nobody becomes a "manager not found" card and a
reporting loop becomes a "cycle detected" card, so the chart always renders.

## REST API Endpoints

- `/` - The rendered chart
- `/api/tree` - The current tree as JSON
- `/api/status` - Refresh status and roster size
- `/api/toggle/{key}` - Opens or closes one node of the current chart
- `/api/expand_all`, `/api/collapse_all` - Opens or closes every line and role
- `/api/refresh` - Fetches the roster immediately
*/

pub mod config;
pub mod employee;
pub mod expand;
pub mod hierarchy;
pub mod loader;
pub mod salary;
pub mod style;
pub mod view;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod source;

/// Re-export the types most callers need
pub use employee::{Employee, NO_LINE, Roster};
pub use expand::ExpandState;
pub use hierarchy::{HierarchyBuilder, Node, NodeKind, build_tree};
