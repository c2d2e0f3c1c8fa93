// SPDX-License-Identifier: BUSL-1.1
//! Route modules for the GAVEL API surface.

pub mod admin;
pub mod disputes;
pub mod health;
