use std::path::PathBuf;

use contacts_service::channel::ContactsPlugin;
use contacts_service::config::ServiceConfig;
use contacts_service::db::schema;
use tracing_subscriber::EnvFilter;

fn main() {
    let mut args = std::env::args().skip(1);
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                db_path = args.next().map(PathBuf::from);
                if db_path.is_none() {
                    eprintln!("Error: --file requires a path argument");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                config_path = args.next().map(PathBuf::from);
                if config_path.is_none() {
                    eprintln!("Error: --config requires a JSON file path");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("contacts-service - contacts method channel over a local provider");
                println!();
                println!("Usage: contacts-service [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>      Provider database path (default: .data/contacts.db)");
                println!("  -c, --config <PATH>    JSON config file");
                println!("  -h, --help             Show this help");
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    let mut config = match config_path {
        Some(path) => match ServiceConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ServiceConfig::default(),
    };
    if let Some(path) = db_path {
        config.database_path = path;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(dir) = config.database_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error creating {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let conn = match rusqlite::Connection::open(&config.database_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(database = %config.database_path.display(), "contacts service ready");
    let plugin = ContactsPlugin::new(conn, &config, runtime.handle().clone());
    contacts_service::cli::run(&plugin);
}
