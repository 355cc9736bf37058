use clap::Subcommand;
use silk_app::{context::AppContext, notice::Notice};

use super::notice;

#[derive(Debug, Subcommand)]
pub(crate) enum SearchCommand {
    /// Remember a search term
    Add {
        /// Search term
        term: String,
    },

    /// Show recent searches, most recent first
    List,

    /// Forget recent searches
    Clear,
}

pub(crate) fn run(context: &AppContext, command: SearchCommand) -> Result<(), String> {
    match command {
        SearchCommand::Add { term } => {
            context
                .storage
                .record_search(&term)
                .map_err(|error| notice(&error))?;
        }
        SearchCommand::List => {
            let history = context
                .storage
                .search_history()
                .map_err(|error| notice(&error))?;

            if history.is_empty() {
                println!("{}", Notice::info("No recent searches"));
            }

            for term in history.entries() {
                println!("{term}");
            }
        }
        SearchCommand::Clear => {
            context
                .storage
                .clear_search_history()
                .map_err(|error| notice(&error))?;

            println!("{}", Notice::success("Search history cleared"));
        }
    }

    Ok(())
}
