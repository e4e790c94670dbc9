pub mod victims;
