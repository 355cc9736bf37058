use std::path::PathBuf;

use clap::Args;
use silk::{payment::PaymentMethod, pricing::PricingPolicy};
use silk_app::quote::QuoteFile;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// YAML cart file
    file: PathBuf,

    /// Price as cash on delivery, whatever the file says
    #[arg(long, conflicts_with = "card")]
    cod: bool,

    /// Price as card payment, whatever the file says
    #[arg(long)]
    card: bool,
}

pub(crate) fn run(args: &QuoteArgs) -> Result<(), String> {
    let mut file = QuoteFile::load(&args.file)
        .map_err(|error| format!("failed to load {}: {error}", args.file.display()))?;

    if args.cod {
        file = file.with_payment_method(PaymentMethod::Cod);
    } else if args.card {
        file = file.with_payment_method(PaymentMethod::Card);
    }

    let quote = file
        .price(&PricingPolicy::default())
        .map_err(|error| format!("failed to price cart: {error}"))?;

    super::print_receipt(&quote.items, &quote.breakdown)
}
