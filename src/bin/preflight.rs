use chirpline::app::{connect_media, connect_store};
use chirpline::infra::config::{AppConfig, MediaBackend, StoreBackend};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           JWT_SECRET_KEY\n\
           DATABASE_URL (STORE_BACKEND=postgres, the default)\n\
           CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET\n\
             (MEDIA_BACKEND=cloudinary, the default)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  PORT={}", config.port);
    println!("  STORE_BACKEND={:?}", config.store_backend);
    println!("  MEDIA_BACKEND={:?}", config.media_backend);
    println!("  CLIENT_ORIGIN={}", config.client_origin);
    println!("  JWT_EXPIRY={}s", config.jwt_expiry.as_secs());
    println!("  MAX_UPLOAD_BYTES={}", config.max_upload_bytes);

    // Connecting also creates any missing tables.
    let store = connect_store(&config).await?;
    store
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Store ping failed: {}", e))?;
    match config.store_backend {
        StoreBackend::Postgres => println!("  Database reachable, schema in place."),
        StoreBackend::Memory => println!("  Using the in-memory store (data is lost on restart)."),
    }

    let media = connect_media(&config)?;
    media
        .check()
        .await
        .map_err(|e| anyhow::anyhow!("Object storage check failed: {}", e))?;
    match config.media_backend {
        MediaBackend::Cloudinary => println!("  Cloudinary credentials accepted."),
        MediaBackend::Memory => println!("  Using in-memory object storage."),
    }

    println!("> Preflight OK.");
    Ok(())
}
