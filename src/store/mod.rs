// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! On-disk state: per-session workspace directories.
//!
//! A workspace is the only persisted state in the system. Each session owns
//! a disjoint pair of subtrees (upload area, extraction area) that are
//! cleared at the start of every upload cycle.

pub mod workspace;

pub use workspace::{clear_dir, StoreError, Workspace, WorkspaceStore};
