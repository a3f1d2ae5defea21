pub mod palette;
pub mod status_bar;
pub mod toolbar;
