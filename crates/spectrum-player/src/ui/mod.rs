pub mod bindings;
pub mod drop_zone;
pub mod style_button;

pub use style_button::StyleButton;
