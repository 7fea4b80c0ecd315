// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Hydro application.

pub mod canvas;
pub mod feedback;
pub mod notice;
pub mod prompt;
pub mod sidebar;
pub mod toolbar;
