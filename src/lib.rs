// Watermark Studio library
// Rendering engine, image I/O and the editing session a front end drives

pub mod config;
pub mod image_io;
pub mod logging;
pub mod session;
pub mod watermark;
