use company_directory::application::{CompanyService, ServiceCatalog};
use company_directory::domain::{NewCompany, NewService, PageRequest};
use company_directory::infrastructure::{connect, AppConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,company_directory=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let stores = connect(&config.store).await?;
    let timeout = config.store.operation_timeout();

    let companies = CompanyService::with_timeout(stores.companies, timeout);
    let catalog = ServiceCatalog::with_timeout(stores.services, timeout);

    for n in 0..config.seed.companies {
        let company = NewCompany::new(format!("Company {n}"))
            .with_category("barber")
            .with_location("Warsaw")
            .with_descriptions(
                format!("Short description of company {n}"),
                format!("Long description of company {n}, with every detail a customer needs."),
            );
        let company_id = companies.create(company).await?;

        for s in 0..config.seed.services_per_company {
            let service = NewService::new(format!("Service {s}"), 1000 + 50 * s as u32, 30)
                .with_description(format!("Service {s} of company {n}"));
            catalog.add(company_id, service).await?;
        }
        info!(%company_id, services = config.seed.services_per_company, "company seeded");
    }

    let page = companies.list(PageRequest::default()).await?;
    info!(
        companies = page.len(),
        next_cursor = ?page.next_cursor,
        "first page of companies"
    );
    println!("{}", serde_json::to_string_pretty(&page)?);

    if let Some(first) = page.items.first() {
        let detail = companies.get(first.id).await?;
        println!("{}", serde_json::to_string_pretty(&detail)?);
    }

    Ok(())
}
