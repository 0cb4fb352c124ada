pub mod http;
pub mod news;
pub mod registry;
pub mod search;
pub mod weather;
pub mod youtube;
