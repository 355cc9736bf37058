use clap::Subcommand;
use silk_app::{context::AppContext, notice::Notice};

use super::notice;

#[derive(Debug, Subcommand)]
pub(crate) enum WishlistCommand {
    /// Save a product to the wishlist
    Add {
        /// Product identifier
        product_id: String,
    },

    /// Remove a product from the wishlist
    Remove {
        /// Product identifier
        product_id: String,
    },
}

pub(crate) async fn run(context: &AppContext, command: WishlistCommand) -> Result<(), String> {
    let token = context
        .session
        .require_token()
        .await
        .map_err(|error| notice(&error))?;

    let message = match command {
        WishlistCommand::Add { product_id } => {
            context
                .api
                .add_to_wishlist(&token, &product_id)
                .await
                .map_err(|error| notice(&error))?;

            "Added to wishlist"
        }
        WishlistCommand::Remove { product_id } => {
            context
                .api
                .remove_from_wishlist(&token, &product_id)
                .await
                .map_err(|error| notice(&error))?;

            "Removed from wishlist"
        }
    };

    println!("{}", Notice::success(message));

    Ok(())
}
