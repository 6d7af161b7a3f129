//! Web 服务器主程序入口

#[cfg(feature = "web")]
use std::sync::Arc;

#[cfg(feature = "web")]
use wordsaver::{
    background::BackgroundService,
    cache::spawn_cleanup_task,
    config::{ConfigManager, WordSaverConfig},
    env::{self, EnvVar},
    store::JsonFileStore,
    web::{WebConfig, WebServer},
};

#[cfg(feature = "web")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                bind_addr = Some(required_value(&args, i, "--bind requires an address"));
                i += 2;
            }
            "--port" | "-p" => {
                let value = required_value(&args, i, "--port requires a port number");
                port = Some(value.parse().unwrap_or_else(|_| {
                    eprintln!("Error: Invalid port number");
                    std::process::exit(1);
                }));
                i += 2;
            }
            "--config" | "-c" => {
                config_path = Some(required_value(&args, i, "--config requires a file path"));
                i += 2;
            }
            "--example-config" => {
                let path = required_value(&args, i, "--example-config requires a file path");
                ConfigManager::generate_example_config(&path)?;
                println!("示例配置已写入: {}", path);
                return Ok(());
            }
            "--env-docs" => {
                println!("{}", env::generate_env_docs());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    init_logging();

    let manager = match config_path {
        Some(path) => ConfigManager::from_file(&path)?,
        None => ConfigManager::new()?,
    };
    let mut config: WordSaverConfig = manager.into_config();
    if let Some(bind_addr) = bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let store = Arc::new(JsonFileStore::new(config.data_file_path()));
    tracing::info!("数据文件: {}", store.path().display());

    let service = Arc::new(BackgroundService::from_config(&config, store)?);

    spawn_cleanup_task(
        service.translation_cache(),
        config.translation_cache().cleanup_interval,
        "translation",
    );
    spawn_cleanup_task(
        service.dictionary_cache(),
        config.dictionary_cache().cleanup_interval,
        "dictionary",
    );

    let server = WebServer::new(WebConfig::from(&config), service);
    server.start().await?;

    Ok(())
}

#[cfg(feature = "web")]
fn required_value(args: &[String], index: usize, message: &str) -> String {
    match args.get(index + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "web")]
fn init_logging() {
    let level = env::core::LogLevel::get().unwrap_or_else(|e| {
        eprintln!("警告: {}，使用 info", e);
        "info".to_string()
    });

    let filter = tracing_subscriber::EnvFilter::try_new(format!("wordsaver={level},wordsaver_web={level}"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "web")]
fn print_help() {
    println!("WordSaver Web Server");
    println!();
    println!("USAGE:");
    println!("    wordsaver-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>         Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>            Port number [default: 7081]");
    println!("    -c, --config <FILE>          Configuration file (toml or json)");
    println!("        --example-config <FILE>  Write an example configuration file");
    println!("        --env-docs               Print supported environment variables");
    println!("    -h, --help                   Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    wordsaver-web");
    println!("    wordsaver-web --bind 0.0.0.0 --port 3000");
}

#[cfg(not(feature = "web"))]
fn main() {
    eprintln!("Error: Web feature not enabled. Please compile with --features web");
    std::process::exit(1);
}
