use crate::infra::{default_assessment_config, sample_borrower_files, InMemoryBorrowerRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use loanlens::error::AppError;
use loanlens::portfolio::{
    query, BorrowerBookImporter, BorrowerRecord, CustomerTier, EmploymentType, Gender,
    LoanApplication, PortfolioPage, PortfolioService, QuerySpec, ResidenceType,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PortfolioListArgs {
    /// Case-insensitive search term matched against name and email
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Risk filter: all, low, medium, or high
    #[arg(long)]
    pub(crate) risk: Option<String>,
    /// Sort field: name, email, loan_amount, loan_term, credit_score,
    /// risk_level, or last_analyzed
    #[arg(long)]
    pub(crate) sort: Option<String>,
    /// Sort direction: asc or desc
    #[arg(long)]
    pub(crate) direction: Option<String>,
    /// Borrower book CSV to query instead of the bundled sample data
    #[arg(long)]
    pub(crate) book: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the analysis date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Borrower book CSV to seed the demo repository
    #[arg(long)]
    pub(crate) book: Option<PathBuf>,
    /// Skip the intake portion of the demo
    #[arg(long)]
    pub(crate) skip_intake: bool,
}

pub(crate) fn run_portfolio_list(args: PortfolioListArgs) -> Result<(), AppError> {
    let spec = QuerySpec::from_params(
        args.search.as_deref(),
        args.risk.as_deref(),
        args.sort.as_deref(),
        args.direction.as_deref(),
    )?;

    let book = load_book(args.book)?;
    let total = book.len();
    let rows = query(&book, &spec);

    println!("Borrower portfolio");
    render_rows(&rows);
    println!("Showing {} of {} borrowers", rows.len(), total);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        book,
        skip_intake,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("LoanLens demo");
    let repository = match book {
        Some(path) => {
            let records = BorrowerBookImporter::from_path(path)?;
            Arc::new(InMemoryBorrowerRepository::from_records(records))
        }
        None => Arc::new(InMemoryBorrowerRepository::seeded(sample_borrower_files())),
    };
    let service = PortfolioService::new(repository, default_assessment_config());

    let full = match service.list(&QuerySpec::default()) {
        Ok(page) => page,
        Err(err) => {
            println!("  Portfolio unavailable: {err}");
            return Ok(());
        }
    };
    println!("\nFull book ({} borrowers)", full.total);
    render_page(&full);

    let spec = QuerySpec::from_params(None, Some("high"), Some("credit_score"), Some("asc"))?;
    match service.list(&spec) {
        Ok(page) => {
            println!("\nHigh-risk borrowers, lowest score first");
            render_page(&page);
        }
        Err(err) => println!("  Query unavailable: {err}"),
    }

    if skip_intake {
        return Ok(());
    }

    println!("\nIntake demo");
    let file = match service.submit(demo_application(), today) {
        Ok(file) => file,
        Err(err) => {
            println!("  Intake rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Accepted borrower {} -> score {}/100 ({})",
        file.record.id.0,
        file.record.credit_score,
        file.record.risk_level.display_label()
    );

    if let Some(assessment) = &file.assessment {
        println!("  Assessment factors:");
        for factor in &assessment.factors {
            println!(
                "    - {:?}: {} ({})",
                factor.kind, factor.score, factor.notes
            );
        }
        println!(
            "  Default probability {:.2} -> prediction {}",
            assessment.default_probability,
            if assessment.default_prediction {
                "default"
            } else {
                "no default"
            }
        );
    }

    match service.analyze(&file.record.id, today) {
        Ok(outcome) => println!(
            "  Re-analysis on {}: score {}/100 ({})",
            outcome.analyzed_on,
            outcome.credit_score,
            outcome.risk_level.display_label()
        ),
        Err(err) => println!("  Re-analysis unavailable: {err}"),
    }

    match service.get(&file.record.id) {
        Ok(fetched) => match serde_json::to_string_pretty(&fetched.detail_view()) {
            Ok(json) => println!("  Detail payload:\n{json}"),
            Err(err) => println!("  Detail payload unavailable: {err}"),
        },
        Err(err) => println!("  Detail lookup unavailable: {err}"),
    }

    Ok(())
}

fn demo_application() -> LoanApplication {
    LoanApplication {
        name: "Nina Patel".to_string(),
        email: "nina.p@example.com".to_string(),
        loan_amount: 100000,
        loan_term_months: 48,
        rate_of_interest: 9.8,
        emi: None,
        customer_age: 60,
        gender: Gender::Female,
        employment_type: EmploymentType::Retired,
        residence_type: ResidenceType::Own,
        num_loans: 6,
        secured_loans: 4,
        unsecured_loans: 2,
        new_loans_last_3_months: 0,
        tier: CustomerTier::Tier1,
    }
}

fn load_book(book: Option<PathBuf>) -> Result<Vec<BorrowerRecord>, AppError> {
    match book {
        Some(path) => BorrowerBookImporter::from_path(path).map_err(AppError::from),
        None => Ok(sample_borrower_files()
            .into_iter()
            .map(|file| file.record)
            .collect()),
    }
}

fn render_page(page: &PortfolioPage) {
    render_rows(&page.borrowers);
    println!("Showing {} of {} borrowers", page.matched, page.total);
}

fn render_rows(rows: &[BorrowerRecord]) {
    if rows.is_empty() {
        println!("- no borrowers matched");
        return;
    }
    for record in rows {
        println!(
            "- {} | {} <{}> | ${} over {} mo | score {}/100 | {} | analyzed {}",
            record.id.0,
            record.name,
            record.email,
            record.loan_amount,
            record.loan_term_months,
            record.credit_score,
            record.risk_level.display_label(),
            record.last_analyzed
        );
    }
}
