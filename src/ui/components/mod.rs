pub mod attachment_bar;
pub mod input_bar;
pub mod notices;
pub mod session_bar;
pub mod transcript;
