pub mod help_modal;
pub mod status_bar;
