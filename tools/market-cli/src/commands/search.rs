//! Search command.

use anyhow::Result;
use market_sdk::market_observability::AttemptOutcome;
use market_sdk::prelude::{normalize, RawFilters, SearchError};
use serde_json::json;

use super::SearchArgs;
use crate::context::Context;
use crate::output::format_micros;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let request = normalize(&args.query, &RawFilters::from_query_string(&args.filters));
    let filters = &request.filters;

    let outcome = match ctx.market.search_with_report(&request.query, filters).await {
        Ok(outcome) => outcome,
        Err(SearchError::Unavailable { trace }) => {
            if args.report && !ctx.output.is_json() {
                for attempt in &trace.attempts {
                    ctx.output.warn(&format!("{}: {}", attempt.backend, describe(&attempt.outcome)));
                }
            }
            anyhow::bail!("Search unavailable: every backend failed");
        }
    };

    if ctx.output.is_json() {
        if args.report {
            ctx.output.json(&json!({ "results": outcome.page, "attempts": outcome.trace }));
        } else {
            ctx.output.json(&outcome.page);
        }
        return Ok(());
    }

    let pagination = &outcome.page.pagination;
    let title = if request.query.is_empty() {
        "Browse".to_string()
    } else {
        format!("Results for \"{}\"", request.query)
    };
    ctx.output.header(&title);
    ctx.output.kv("Sort", filters.sort.display_name());
    ctx.output.kv(
        "Page",
        &format!(
            "{} of {} ({} matches)",
            pagination.page, pagination.total_pages, pagination.total
        ),
    );
    ctx.output.kv("Served by", outcome.served_by());

    if outcome.page.is_empty() {
        ctx.output.info("No products found.");
    } else {
        println!();
        ctx.output.ranked(&outcome.page.items);
    }

    if args.report {
        ctx.output.header("Attempts");
        for attempt in &outcome.trace.attempts {
            ctx.output.kv(
                &attempt.backend,
                &format!("{} in {}", describe(&attempt.outcome), format_micros(attempt.duration_us)),
            );
        }
        ctx.output.kv("Total", &format_micros(outcome.trace.total_us()));
    }

    Ok(())
}

fn describe(outcome: &AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Served => "served".to_string(),
        AttemptOutcome::NotConfigured(reason) => format!("skipped ({})", reason),
        AttemptOutcome::Failed(reason) => format!("failed ({})", reason),
    }
}
