pub mod use_ternary_input;
