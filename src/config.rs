use crate::session::store::default_store_path;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/chat";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Desktop chat client for the HR policy assistant", long_about = None)]
pub struct Config {
    /// Chat endpoint that answers `{"message": ...}` with `{"answer": ...}`
    #[arg(long, env = "POLICY_CHAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// File holding the saved chat history
    #[arg(long, env = "POLICY_CHAT_STORE")]
    pub store: Option<PathBuf>,

    /// Default log filter, used when RUST_LOG is unset
    #[arg(long, env = "POLICY_CHAT_LOG", default_value = "info")]
    pub log_level: String,

    /// Give up on a reply after this many seconds (no limit when unset)
    #[arg(long, env = "POLICY_CHAT_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
