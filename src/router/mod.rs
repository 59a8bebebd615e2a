mod group;
mod params;
pub mod pattern;
mod routes;
mod trie;

pub(crate) use self::group::SharedRoutes;
pub use self::group::RouterGroup;
pub use self::params::{Param, Params};
pub use self::routes::Routes;
pub use self::trie::Node;
