pub mod config;
pub mod notification;
pub mod runtime;
pub mod update;

pub use config::*;
pub use notification::*;
pub use runtime::*;
pub use update::*;
