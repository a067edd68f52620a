#![allow(clippy::new_without_default)]

pub mod collect;
pub mod dispatch;
pub mod error;
pub mod exceptions;
pub mod frame;
pub mod native;
pub mod options;
pub mod registry;
pub mod value;
pub mod vm;
