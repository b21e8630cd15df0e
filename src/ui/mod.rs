pub mod app;
pub mod audio;
pub mod center_panel;
pub mod left_panel;
pub mod settings;
pub mod settings_io;
