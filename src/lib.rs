// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

pub mod backend;
pub mod config;
pub mod error;
pub mod fleet;
pub mod store;

pub use error::{FsError, Result};
pub use fleet::{part_key, Fleet, RateLimit};
pub use store::{PartStore, PartStream};
