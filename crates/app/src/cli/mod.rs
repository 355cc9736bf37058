use std::{fmt, io};

use clap::{Parser, Subcommand};
use silk::{items::CartItem, pricing::PriceBreakdown, receipt::CheckoutSummary};
use silk_app::{
    config::{ClientConfig, LoggingConfig},
    context::AppContext,
    notice::Notice,
    observability,
};
use tracing::debug;

mod account;
mod cart;
mod coupons;
mod gift_wraps;
mod orders;
mod quote;
mod search;
mod tickets;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "silk", about = "Silk storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    client: ClientConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a YAML cart file offline
    Quote(quote::QuoteArgs),

    /// Check coupon definitions offline
    #[command(subcommand)]
    Coupons(coupons::CouponsCommand),

    /// Sign in
    Login(account::LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in profile
    Profile,

    /// Quote the remote cart, optionally placing the order
    Cart(cart::CartArgs),

    /// List gift wraps on offer
    GiftWraps,

    /// List your orders
    Orders,

    /// Follow an order's status until it is delivered
    Watch(orders::WatchArgs),

    /// Manage the wishlist
    #[command(subcommand)]
    Wishlist(wishlist::WishlistCommand),

    /// Support tickets
    #[command(subcommand)]
    Tickets(tickets::TicketsCommand),

    /// Recent searches
    #[command(subcommand)]
    Search(search::SearchCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging).map_err(|error| error.to_string())?;

        match &self.command {
            Commands::Quote(args) => return quote::run(args),
            Commands::Coupons(command) => return coupons::run(command),
            _ => {}
        }

        let context = AppContext::from_config(&self.client)
            .await
            .map_err(|error| error.to_string())?;

        match self.command {
            Commands::Quote(_) | Commands::Coupons(_) => Ok(()),
            Commands::Login(args) => account::login(&context, args).await,
            Commands::Logout => account::logout(&context).await,
            Commands::Profile => account::profile(&context).await,
            Commands::Cart(args) => cart::run(&context, &args).await,
            Commands::GiftWraps => gift_wraps::run(&context).await,
            Commands::Orders => orders::list(&context).await,
            Commands::Watch(args) => orders::watch(&context, &args).await,
            Commands::Wishlist(command) => wishlist::run(&context, command).await,
            Commands::Tickets(command) => tickets::run(&context, command).await,
            Commands::Search(command) => search::run(&context, command),
        }
    }
}

/// User-facing message for a failed command.
fn notice<E>(error: &E) -> String
where
    E: fmt::Display,
    for<'a> Notice: From<&'a E>,
{
    debug!(%error, "command failed");

    Notice::from(error).to_string()
}

fn print_receipt(items: &[CartItem], breakdown: &PriceBreakdown) -> Result<(), String> {
    CheckoutSummary::new(items, breakdown)
        .write_to(io::stdout().lock())
        .map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn nested_subcommands_parse() -> TestResult {
        let remove = Cli::try_parse_from(["silk", "wishlist", "remove", "sku-robe"])?;
        let open = Cli::try_parse_from([
            "silk", "tickets", "open", "--subject", "Late", "--message", "Still waiting",
        ])?;
        let add = Cli::try_parse_from(["silk", "search", "add", "lace"])?;
        let check = Cli::try_parse_from(["silk", "coupons", "check", "luxe20.yaml"])?;

        assert!(matches!(
            remove.command,
            Commands::Wishlist(wishlist::WishlistCommand::Remove { ref product_id })
                if product_id == "sku-robe"
        ));
        assert!(matches!(
            open.command,
            Commands::Tickets(tickets::TicketsCommand::Open { ref order, .. }) if order.is_none()
        ));
        assert!(matches!(
            add.command,
            Commands::Search(search::SearchCommand::Add { ref term }) if term == "lace"
        ));
        assert!(matches!(
            check.command,
            Commands::Coupons(coupons::CouponsCommand::Check(_))
        ));

        Ok(())
    }

    #[test]
    fn wishlist_requires_an_action() {
        assert!(Cli::try_parse_from(["silk", "wishlist"]).is_err());
    }
}
