use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

pub struct Config {
    pub addr: SocketAddr,
    pub root: PathBuf,
    pub chunk_size: usize,
    pub max_path: usize,
    pub io_timeout: Duration,
    pub reset_version_on_delete: bool,
}

impl Config {
    pub fn new() -> Config {
        Config {
            addr: match env::var("STASH_ADDR") {
                Ok(var) => var.parse().expect("STASH_ADDR is not a socket address"),
                Err(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 2000),
            },
            root: match env::var("STASH_ROOT") {
                Ok(var) => PathBuf::from(var),
                Err(_) => PathBuf::from("."),
            },
            chunk_size: match env::var("STASH_CHUNK_SIZE") {
                Ok(var) => var.parse().expect("STASH_CHUNK_SIZE is not a number"),
                Err(_) => 1024,
            },
            max_path: match env::var("STASH_MAX_PATH") {
                Ok(var) => var.parse().expect("STASH_MAX_PATH is not a number"),
                Err(_) => 1024,
            },
            io_timeout: Duration::from_secs(match env::var("STASH_IO_TIMEOUT_SECS") {
                Ok(var) => var.parse().expect("STASH_IO_TIMEOUT_SECS is not a number"),
                Err(_) => 30,
            }),
            reset_version_on_delete: match env::var("STASH_RESET_VERSION_ON_DELETE") {
                Ok(var) => var == "true" || var == "1",
                Err(_) => false,
            },
        }
    }
}
