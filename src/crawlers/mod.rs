pub mod discoverer;
pub mod pool;

pub use discoverer::LinkDiscoverer;
pub use pool::ContentPool;
