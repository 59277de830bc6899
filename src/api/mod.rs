//! HTTP API

pub mod answers;
pub mod health;
pub mod images;
pub mod questions;

pub use answers::answer_routes;
pub use health::health_routes;
pub use images::image_routes;
pub use questions::question_routes;
