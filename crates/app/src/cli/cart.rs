use std::{fs, path::PathBuf};

use clap::Args;
use silk::{address::Address, payment::PaymentMethod};
use silk_app::{checkout::Placement, context::AppContext, notice::Notice};

use super::notice;

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Coupon code to redeem
    #[arg(long)]
    coupon: Option<String>,

    /// Gift wrap identifier (see `gift-wraps`)
    #[arg(long)]
    gift_wrap: Option<String>,

    /// Message to include with the gift wrap
    #[arg(long, requires = "gift_wrap")]
    gift_message: Option<String>,

    /// Pay cash on delivery instead of by card
    #[arg(long)]
    cod: bool,

    /// Place the order, shipping to the address in this YAML file
    #[arg(long, value_name = "ADDRESS_FILE")]
    place: Option<PathBuf>,
}

pub(crate) async fn run(context: &AppContext, args: &CartArgs) -> Result<(), String> {
    let mut checkout = context.checkout().await.map_err(|error| notice(&error))?;

    if checkout.items().is_empty() {
        println!("{}", Notice::info("Your cart is empty"));
        return Ok(());
    }

    if args.cod {
        checkout.set_payment_method(PaymentMethod::Cod);
    }

    if let Some(wrap_id) = &args.gift_wrap {
        let wrap = context
            .api
            .gift_wraps()
            .await
            .map_err(|error| notice(&error))?
            .into_iter()
            .find(|wrap| wrap.id() == wrap_id)
            .ok_or_else(|| format!("gift wrap {wrap_id} not found"))?;

        checkout
            .select_gift_wrap(wrap, args.gift_message.clone())
            .await
            .map_err(|error| notice(&error))?;

        context.session.sync_membership(checkout.membership()).await;
    }

    if let Some(code) = &args.coupon {
        match checkout.apply_coupon(code).await {
            Ok(applied) => println!(
                "{}",
                Notice::success(format!("Coupon {} applied: -{}", applied.code, applied.discount))
            ),
            Err(error) => println!("{}", notice(&error)),
        }
    }

    let breakdown = checkout.quote().map_err(|error| notice(&error))?;

    super::print_receipt(checkout.items(), &breakdown)?;

    let Some(address_file) = &args.place else {
        return Ok(());
    };

    let address: Address = fs::read_to_string(address_file)
        .map_err(|error| format!("failed to read {}: {error}", address_file.display()))
        .and_then(|yaml| {
            serde_norway::from_str(&yaml)
                .map_err(|error| format!("failed to parse {}: {error}", address_file.display()))
        })?;

    match checkout
        .place_order(address)
        .await
        .map_err(|error| notice(&error))?
    {
        Placement::Placed { order_id } => {
            println!("{}", Notice::success("Order placed"));
            println!("order_id: {order_id}");
        }
        Placement::AwaitingPayment(gateway) => {
            println!("gateway_order_id: {}", gateway.id);
            println!("amount: {}", gateway.amount);
            println!("complete the card payment in the payment widget to finish this order");
        }
    }

    Ok(())
}
