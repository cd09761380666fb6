use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_ils::infrastructure::AppState;
use library_ils::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_ils=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    if let Some(days) = config.loan_policy.loan_period_days {
        tracing::info!(
            "Loan period {} day(s), fine {:.2} per day late",
            days,
            config.loan_policy.fine_per_day
        );
    } else {
        tracing::info!("Due-date tracking disabled (set LOAN_PERIOD_DAYS to enable)");
    }

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    let state = match AppState::with_config(db, &config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to build application state: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(state, &config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
