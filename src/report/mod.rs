// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structured extraction for the two specially named bundle members.
//!
//! Both parsers degrade instead of failing: unreadable or malformed input is
//! logged and produces sentinel-filled output, never an error. Structural
//! problems stay the caller's concern; parse problems end here.

pub mod cluster;
pub mod sysconfig;

pub use cluster::parse_cluster_info;
pub use sysconfig::parse_sysconfig;
