pub mod ternary_input;
pub mod thank_you_modal;
