use carelog::{
    config::{database, seed},
    core::{schedule, setup},
    desk::CareDesk,
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Seed data is only used if the store is empty
    let seed_config = seed::load_seed_or_builtin(seed::seed_file_path())
        .inspect_err(|e| error!("Failed to load seed data: {}", e))?;

    // 4. Open and initialize storage; nothing works without it
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection opened."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    setup::initialize(&db, &seed_config)
        .await
        .inspect(|created| info!("Database ready (schema created: {}).", created))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Today's checklist and report
    let desk = CareDesk::new(db);
    let today = schedule::today();

    let doses = desk.list_orders_for_today().await;
    let day = schedule::format_date(today);
    info!("{} doses scheduled for {}", doses.len(), day);
    for dose in &doses {
        let state = if dose.order.administered {
            "given"
        } else {
            "pending"
        };
        info!(
            "{} - {} at {} [{}]",
            dose.patient_name, dose.order.medication, dose.order.scheduled_time, state
        );
    }

    if let Some(report) = desk.report_for_today().await {
        info!(
            "Patients: {}, doses today: {}, adherence: {:.1}%",
            report.total_patients, report.doses_scheduled, report.adherence_percent
        );
    }

    Ok(())
}
