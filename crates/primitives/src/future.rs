use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that is not required to be Send.
///
/// Host operations run on a single cooperative event loop, so nothing here
/// needs to cross threads.
pub type BoxFutureLocal<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
