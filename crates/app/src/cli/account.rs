use clap::Args;
use silk_app::{api::Credentials, context::AppContext, notice::Notice};

use super::notice;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "SILK_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(context: &AppContext, args: LoginArgs) -> Result<(), String> {
    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };

    let profile = context
        .session
        .login(&credentials)
        .await
        .map_err(|error| notice(&error))?;

    println!("{}", Notice::success(format!("Welcome back, {}", profile.name)));

    Ok(())
}

pub(crate) async fn logout(context: &AppContext) -> Result<(), String> {
    context
        .session
        .logout()
        .await
        .map_err(|error| notice(&error))?;

    println!("{}", Notice::success("Signed out"));

    Ok(())
}

pub(crate) async fn profile(context: &AppContext) -> Result<(), String> {
    let profile = context
        .session
        .refresh_profile()
        .await
        .map_err(|error| notice(&error))?;

    let membership = profile.membership;

    println!("name: {}", profile.name);
    println!("email: {}", profile.email);
    println!(
        "luxe_member: {}",
        if membership.is_luxe_member { "yes" } else { "no" }
    );

    if membership.is_luxe_member {
        println!("free_gift_wraps_left: {}", membership.gift_wraps_left);
    }

    println!("wishlist_items: {}", profile.wishlist.len());

    Ok(())
}
