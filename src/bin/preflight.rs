use tourism_arrivals_api::infra::config::Settings;
use tourism_arrivals_api::infra::telemetry;
use tourism_arrivals_api::RecordStore;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DB_MAX_CONNECTIONS, RUST_LOG\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    dotenv::dotenv().ok();
    telemetry::init_tracing();
    let settings = Settings::from_env()?;

    println!("> Preflight:");
    println!("  DATABASE_URL={}", settings.database_url);

    let store = RecordStore::connect(&settings.database_url, 1).await?;
    store.ping().await?;
    println!("  Database reachable.");

    let table = store.schema().table_name();
    match store.missing_columns().await? {
        None => {
            println!("  Table {} does not exist (api_server creates it on startup).", table);
            std::process::exit(1);
        }
        Some(missing) if !missing.is_empty() => {
            println!("  Table {} is missing columns: {}", table, missing.join(", "));
            std::process::exit(1);
        }
        Some(_) => {
            let rows = store.fetch_all().await?.len();
            println!("  Table {} matches the schema ({} rows).", table, rows);
        }
    }

    println!("> Preflight OK");
    Ok(())
}
