//! Boundary to the code that copies bound values into typed instances.

use crate::dom::Dom;
use crate::error::Result;

/// Copies the values of a document node into an instance of `T`.
///
/// Implementations live outside this crate, one per configurable type. Run
/// them through [`ConfigModel::inject`](crate::model::ConfigModel::inject) to
/// get node locations attached to failures.
pub trait ConfigInjector<T> {
    fn inject<D: Dom>(&self, dom: &D, target: &mut T) -> Result<()>;
}
