//! DeepSeek chat-completions driver.

mod driver;

pub use driver::DeepSeekDriver;
