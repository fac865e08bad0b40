pub mod logging;
pub mod team_config;
pub mod window;
