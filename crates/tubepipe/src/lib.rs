//! HTTP front for [`tubecore`]: accepts a JSON download request and streams
//! yt-dlp's stdout back as the response body.

pub mod cli;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, start_server, AppState};
