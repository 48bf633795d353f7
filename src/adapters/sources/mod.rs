pub mod dotenv_file;
pub mod memory;
pub mod process;
