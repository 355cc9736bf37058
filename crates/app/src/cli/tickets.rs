use clap::Subcommand;
use silk_app::{api::NewTicket, context::AppContext, notice::Notice};
use tabled::{builder::Builder, settings::Style};

use super::notice;

#[derive(Debug, Subcommand)]
pub(crate) enum TicketsCommand {
    /// List your support tickets
    List,

    /// Open a support ticket
    Open {
        /// Short summary
        #[arg(long)]
        subject: String,

        /// What went wrong
        #[arg(long)]
        message: String,

        /// Order the ticket is about
        #[arg(long)]
        order: Option<String>,
    },
}

pub(crate) async fn run(context: &AppContext, command: TicketsCommand) -> Result<(), String> {
    let token = context
        .session
        .require_token()
        .await
        .map_err(|error| notice(&error))?;

    match command {
        TicketsCommand::List => {
            let tickets = context
                .api
                .tickets(&token)
                .await
                .map_err(|error| notice(&error))?;

            if tickets.is_empty() {
                println!("{}", Notice::info("No support tickets"));
                return Ok(());
            }

            let mut builder = Builder::default();

            builder.push_record(["Ticket", "Subject", "Order", "Status"]);

            for ticket in tickets {
                builder.push_record([
                    ticket.id,
                    ticket.subject,
                    ticket.order_id.unwrap_or_default(),
                    ticket.status,
                ]);
            }

            let mut table = builder.build();
            table.with(Style::modern_rounded());

            println!("{table}");
        }
        TicketsCommand::Open {
            subject,
            message,
            order,
        } => {
            let ticket = NewTicket::new(&subject, &message, order.as_deref())
                .map_err(|error| notice(&error))?;

            let created = context
                .api
                .create_ticket(&token, &ticket)
                .await
                .map_err(|error| notice(&error))?;

            println!("{}", Notice::success("Ticket opened"));
            println!("ticket_id: {}", created.id);
        }
    }

    Ok(())
}
