// SPDX-License-Identifier: MIT

//! Rule storage
//!
//! This module provides:
//! - `RuleSet` - the ordered rules of one form
//! - `RuleStore` - load / replace / clear through the host's metadata
//! - `codec` - the persisted blob format

pub mod codec;
mod repository;
mod set;

pub use repository::RuleStore;
pub use set::RuleSet;
