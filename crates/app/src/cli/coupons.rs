use std::path::PathBuf;

use clap::{Args, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;
use silk_app::{coupons, notice::Notice};

#[derive(Debug, Subcommand)]
pub(crate) enum CouponsCommand {
    /// Check a YAML coupon definition and preview its discount
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    /// YAML coupon definition
    file: PathBuf,

    /// Cart total to preview the discount against
    #[arg(long)]
    cart_total: Option<Decimal>,

    /// Report whether the coupon covers this SKU (repeatable)
    #[arg(long = "sku")]
    skus: Vec<String>,
}

pub(crate) fn run(command: &CouponsCommand) -> Result<(), String> {
    let CouponsCommand::Check(args) = command;

    let definition = coupons::load(&args.file)
        .map_err(|error| format!("failed to load {}: {error}", args.file.display()))?;

    let check = coupons::check(definition, args.cart_total, Timestamp::now())
        .map_err(|error| Notice::error(error.to_string()).to_string())?;

    let coupon = &check.coupon;

    println!("{}", Notice::success(format!("Coupon {} is valid", coupon.code)));
    println!("discount_type: {:?}", coupon.discount_type);
    println!("discount_value: {}", coupon.discount_value);
    println!("min_order_amount: {}", coupon.min_order_amount);
    println!("user_type: {:?}", coupon.user_type);
    println!("expiry_date: {}", coupon.expiry_date);

    for sku in &args.skus {
        println!("covers {sku}: {}", if coupon.covers_sku(sku) { "yes" } else { "no" });
    }

    if let Some(total) = check.cart_total {
        match check.discount {
            Some(discount) => println!("discount on {total}: -{discount}"),
            None => println!("discount on {total}: none (below minimum order amount)"),
        }
    }

    Ok(())
}
