pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod logging;
pub mod machine;
