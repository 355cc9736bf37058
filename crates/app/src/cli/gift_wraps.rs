use silk::membership::Membership;
use silk_app::context::AppContext;
use tabled::{builder::Builder, settings::Style};

use super::notice;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let wraps = context
        .api
        .gift_wraps()
        .await
        .map_err(|error| notice(&error))?;

    if wraps.is_empty() {
        println!("no gift wraps on offer");
        return Ok(());
    }

    let membership = if context.session.is_authenticated().await {
        context
            .session
            .refresh_profile()
            .await
            .map_err(|error| notice(&error))?
            .membership
    } else {
        Membership::standard()
    };

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price"]);

    for wrap in &wraps {
        let price = if membership.luxe_benefit_active() {
            format!("Free ({} left)", membership.gift_wraps_left)
        } else {
            wrap.price().to_string()
        };

        builder.push_record([wrap.id().to_string(), wrap.name().to_string(), price]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}
