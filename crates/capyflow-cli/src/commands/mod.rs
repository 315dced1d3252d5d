pub mod capy;
pub mod config;
pub mod engagement;
pub mod music;
pub mod rewards;
pub mod scene;
pub mod stats;
pub mod timer;
