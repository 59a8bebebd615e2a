//! Built-in middleware.

mod logger;
mod recovery;

pub use self::logger::Logger;
pub use self::recovery::Recovery;
