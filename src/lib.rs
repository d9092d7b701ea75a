pub mod animation;
pub mod app;
pub mod dispatch;
pub mod generators;
pub mod grid;
pub mod rng;
pub mod solvers;
