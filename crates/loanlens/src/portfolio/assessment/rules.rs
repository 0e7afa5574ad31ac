use super::super::domain::{CustomerTier, LoanApplication};
use super::config::AssessmentConfig;
use super::{FactorKind, ScoreFactor};

pub(crate) fn score_application(
    application: &LoanApplication,
    config: &AssessmentConfig,
) -> (Vec<ScoreFactor>, i16) {
    let mut factors = Vec::new();
    let mut total = config.base_score;

    let rate = application.rate_of_interest;
    if rate <= config.comfortable_rate_ceiling {
        push(
            &mut factors,
            &mut total,
            FactorKind::RateExposure,
            10,
            format!(
                "rate {:.1}% within the {:.1}% comfort ceiling",
                rate, config.comfortable_rate_ceiling
            ),
        );
    } else {
        push(
            &mut factors,
            &mut total,
            FactorKind::RateExposure,
            -15,
            format!(
                "rate {:.1}% above the {:.1}% comfort ceiling",
                rate, config.comfortable_rate_ceiling
            ),
        );
    }

    let active = application.num_loans;
    let secured = application.secured_loans;
    if active == 0 {
        push(
            &mut factors,
            &mut total,
            FactorKind::SecuredShare,
            10,
            "no active loans on file".to_string(),
        );
    } else if u16::from(secured) * 2 >= u16::from(active) {
        push(
            &mut factors,
            &mut total,
            FactorKind::SecuredShare,
            15,
            format!("{secured} of {active} active loans secured"),
        );
    } else {
        push(
            &mut factors,
            &mut total,
            FactorKind::SecuredShare,
            -10,
            format!("only {secured} of {active} active loans secured"),
        );
    }

    let recent = application.new_loans_last_3_months;
    if recent == 0 {
        push(
            &mut factors,
            &mut total,
            FactorKind::RecentBorrowing,
            10,
            "no new loans in the last three months".to_string(),
        );
    } else if recent <= 2 {
        push(
            &mut factors,
            &mut total,
            FactorKind::RecentBorrowing,
            -5,
            format!("{recent} new loan(s) in the last three months"),
        );
    } else {
        push(
            &mut factors,
            &mut total,
            FactorKind::RecentBorrowing,
            -20,
            format!("{recent} new loans in the last three months"),
        );
    }

    if active <= config.active_loan_allowance {
        push(
            &mut factors,
            &mut total,
            FactorKind::ActiveLoanLoad,
            5,
            format!(
                "{active} active loan(s) within the allowance of {}",
                config.active_loan_allowance
            ),
        );
    } else {
        push(
            &mut factors,
            &mut total,
            FactorKind::ActiveLoanLoad,
            -10,
            format!(
                "{active} active loans exceeds the allowance of {}",
                config.active_loan_allowance
            ),
        );
    }

    let (tier_score, tier_note) = match application.tier {
        CustomerTier::Tier1 => (10, "top customer tier"),
        CustomerTier::Tier2 => (5, "mid customer tier"),
        CustomerTier::Tier3 => (0, "entry customer tier"),
    };
    push(
        &mut factors,
        &mut total,
        FactorKind::TierStanding,
        tier_score,
        tier_note.to_string(),
    );

    (factors, total)
}

fn push(
    factors: &mut Vec<ScoreFactor>,
    total: &mut i16,
    kind: FactorKind,
    score: i16,
    notes: String,
) {
    factors.push(ScoreFactor { kind, score, notes });
    *total += score;
}
