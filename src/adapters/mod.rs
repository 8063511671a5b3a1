// Adapters layer: concrete implementations of the domain ports (upstream http source).

pub mod http;

pub use http::PokeApiSource;
