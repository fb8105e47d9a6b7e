//! Terminal front-end. `app` holds state and input handling with no terminal
//! dependency; `controller` owns the event loop and `ui` renders.

pub mod app;
pub mod controller;
mod ui;
