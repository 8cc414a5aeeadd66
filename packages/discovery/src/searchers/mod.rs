//! Concrete search backends.

pub mod serpapi;
pub mod tavily;

pub use serpapi::SerpApiProvider;
pub use tavily::TavilyProvider;
