pub mod style;
pub mod widgets;

pub use crate::theme::{default_color_tokens, tokens_for, ColorTokens};
pub use style::{StyleTokens, LAYOUT_TOKENS};
pub use widgets::{choice_button, icon_button, section_label};
