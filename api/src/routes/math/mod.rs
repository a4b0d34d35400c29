pub mod math_engine;
pub mod math_route;
