use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, io};

use clap::Parser;

use inkpost::config::{read_config, write_sample_cfg, Config};
use inkpost::logger::configure_logger;
use inkpost::server::server_run;

const CFG_FILE_NAME: &str = "inkpost.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Run the site server
    Serve(ServeArgs),
    /// Write a sample configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Path to the configuration file. When omitted, the executable
    /// directory, the current directory and the user config directory
    /// are searched in that order
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Where to write the sample configuration
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn get_config_path() -> Option<PathBuf> {
    let exe_path = env::current_exe().unwrap();
    let exe_dir = exe_path.parent().unwrap();
    let cur_dir = env::current_dir().unwrap();

    if exe_dir.join(CFG_FILE_NAME).exists() {
        return Some(exe_dir.join(CFG_FILE_NAME));
    }

    if cur_dir.join(CFG_FILE_NAME).exists() {
        return Some(cur_dir.join(CFG_FILE_NAME));
    }

    let cfg_dir = dirs::config_dir()?;
    if cfg_dir.join(CFG_FILE_NAME).exists() {
        return Some(cfg_dir.join(CFG_FILE_NAME));
    }

    None
}

fn open_config(cfg_path: Option<PathBuf>) -> io::Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        None => return Err(io::Error::new(ErrorKind::NotFound, "Could not find an inkpost configuration")),
        Some(x) => x,
    };

    println!("Reading config from {}", config_path.to_str().unwrap());
    read_config(&config_path)
}

fn init_config(out: Option<PathBuf>) -> io::Result<()> {
    let path = match out {
        Some(path) => path,
        None => env::current_dir()?.join(CFG_FILE_NAME),
    };

    println!("Writing sample config to {}", path.to_str().unwrap());
    write_sample_cfg(&path)
}

#[ntex::main]
async fn main() -> io::Result<()> {
    match Args::parse() {
        Args::Serve(args) => {
            let config = open_config(args.config)?;
            configure_logger(&config)
                .map_err(|e| io::Error::new(ErrorKind::Other, e.to_string()))?;

            println!("Listening on {}:{}", config.server.address, config.server.port);
            server_run(config).await
        }
        Args::Init(args) => init_config(args.out),
    }
}
