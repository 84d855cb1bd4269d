// SPDX-License-Identifier: MIT OR Apache-2.0

mod buffer;
mod convert;
mod frame;
mod layout;
mod types;
pub use buffer::*;
pub use convert::*;
pub use frame::*;
pub use layout::*;
pub use types::*;
