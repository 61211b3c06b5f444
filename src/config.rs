use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub author: String,
    pub base_url: String,
}

#[derive(Deserialize)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: PathBuf,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Views {
    pub location: PathBuf,
    pub flush_secs: Option<u64>,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub server: Server,
    pub log: Option<Log>,
    pub views: Option<Views>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.to_str().unwrap(), e))),
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir),
        template_dir: parse_path(cfg.paths.template_dir),
        public_dir: parse_path(cfg.paths.public_dir),
    };

    Ok(cfg)
}

const CONFIG_SAMPLE: &str = r#"[site]
title = "My corner of the internet"
author = "Sam Robertson"
base_url = "https://samrobertson.dev"

# For the file locations, if you want them to be relative to the
# executable directory, use ${exe_dir}/location
[paths]
posts_dir = "posts"
template_dir = "res/template"
public_dir = "res/public"

[server]
address = "0.0.0.0"
port = 8001

# [views]
# location = "views.json"
# flush_secs = 2
"#;

pub fn write_sample_cfg(file_path: &PathBuf) -> io::Result<()> {
    fs::write(file_path, CONFIG_SAMPLE)
}
