use clap::Args;
use silk::status::{ProgressLevel, StatusProjection};
use silk_app::{context::AppContext, notice::Notice, orders::OrderHistory};
use tabled::{builder::Builder, settings::Style};

use super::notice;

const PROGRESS_STEPS: u8 = 4;

#[derive(Debug, Args)]
pub(crate) struct WatchArgs {
    /// Order identifier
    order_id: String,
}

pub(crate) async fn list(context: &AppContext) -> Result<(), String> {
    let token = context
        .session
        .require_token()
        .await
        .map_err(|error| notice(&error))?;

    let history = OrderHistory::fetch(context.api.as_ref(), &token)
        .await
        .map_err(|error| notice(&error))?;

    if history.is_empty() {
        println!("{}", Notice::info("You have not placed any orders yet"));
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Items", "Total", "Status"]);

    for summary in history.summaries() {
        let order = &summary.order;

        builder.push_record([
            order.id.clone(),
            order.date.strftime("%Y-%m-%d").to_string(),
            order.unit_count().to_string(),
            order.order_total.to_string(),
            order.order_status.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}

pub(crate) async fn watch(context: &AppContext, args: &WatchArgs) -> Result<(), String> {
    let mut watch = context
        .watch_order(&args.order_id)
        .await
        .map_err(|error| notice(&error))?;

    let mut last_status = None;

    while let Some(order) = watch.changed().await {
        if last_status.as_ref() != Some(&order.order_status) {
            println!("{}  {}", order.order_status, progress(order.projection()));
            last_status = Some(order.order_status.clone());
        }

        if order.is_delivered() {
            println!("{}", Notice::success("Delivered"));
            break;
        }
    }

    Ok(())
}

fn progress(projection: StatusProjection) -> String {
    let Some(level) = projection.level() else {
        return "(no longer in transit)".to_string();
    };

    let bar: String = (1..=PROGRESS_STEPS)
        .map(|step| if level.reaches(step) { '●' } else { '○' })
        .collect();

    format!("{bar} {level}/{}", ProgressLevel::DELIVERED)
}
