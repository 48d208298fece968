mod app;
mod keys;
mod render;
mod term;

pub use app::run;
