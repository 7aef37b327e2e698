// SPDX-License-Identifier: MIT

pub mod conditions;
pub mod host;
