use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/supallm/supallm/main";

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const ENV_FILE: &str = ".env";

/// A file fetched from the source repository and where it lands locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteFile {
    pub remote: &'static str,
    pub local: &'static str,
}

/// Download order matters: the env template is rewritten right after.
pub const REQUIRED_FILES: [RemoteFile; 2] = [
    RemoteFile {
        remote: "docker-compose.yml",
        local: COMPOSE_FILE,
    },
    RemoteFile {
        remote: ".env.exemple",
        local: ENV_FILE,
    },
];

/// Which questionnaire to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Clerk credentials, secret key and dashboard port.
    Classic,
    /// Initial user, secret key, dashboard and backend ports, optional launch.
    Standard,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cwd: PathBuf,
    pub source_url: String,
    pub docker_bin: String,
    pub variant: Variant,
}

impl Config {
    pub fn local_path(&self, file: &RemoteFile) -> PathBuf {
        self.cwd.join(file.local)
    }

    pub fn remote_url(&self, file: &RemoteFile) -> String {
        format!("{}/{}", self.source_url.trim_end_matches('/'), file.remote)
    }

    pub fn env_path(&self) -> PathBuf {
        self.cwd.join(ENV_FILE)
    }
}

pub fn resolve_docker_binary() -> String {
    std::env::var("DOCKER_BIN").unwrap_or_else(|_| "docker".to_string())
}

pub fn resolve_source_url() -> String {
    std::env::var("SUPALLM_SOURCE_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string())
}

pub fn get_config(cwd: &Path, variant: Variant) -> Config {
    Config {
        cwd: cwd.to_path_buf(),
        source_url: resolve_source_url(),
        docker_bin: resolve_docker_binary(),
        variant,
    }
}
