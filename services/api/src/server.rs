use crate::cli::ServeArgs;
use crate::infra::{
    default_assessment_config, sample_borrower_files, AppState, InMemoryAccountRepository,
    InMemoryBorrowerRepository,
};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loanlens::accounts::AccountService;
use loanlens::config::AppConfig;
use loanlens::error::AppError;
use loanlens::portfolio::{BorrowerBookImporter, PortfolioService};
use loanlens::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match &config.portfolio.book_path {
        Some(path) => {
            let records = BorrowerBookImporter::from_path(path)?;
            info!(count = records.len(), book = %path.display(), "seeded borrower book from CSV");
            Arc::new(InMemoryBorrowerRepository::from_records(records))
        }
        None => {
            info!("seeded bundled sample borrower book");
            Arc::new(InMemoryBorrowerRepository::seeded(sample_borrower_files()))
        }
    };
    let portfolio_service = Arc::new(PortfolioService::new(
        repository,
        default_assessment_config(),
    ));
    let account_service = Arc::new(AccountService::new(Arc::new(
        InMemoryAccountRepository::default(),
    )));

    let app = with_service_routes(portfolio_service, account_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loanlens service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
