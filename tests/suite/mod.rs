//! Test suite modules

mod session_flow;
mod ui_render;
