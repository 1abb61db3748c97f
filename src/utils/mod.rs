pub mod cpf;
pub mod format;

pub use cpf::{format_cpf, is_valid_cpf};
pub use format::truncate_string;
