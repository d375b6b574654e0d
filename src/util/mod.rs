pub mod clock;
pub mod parse;
pub mod snowflake;
pub mod text;
