use std::sync::Arc;

use clap::{Args, Subcommand};
use storefront_app::{
    carts::{AddItemOutcome, CartSyncController, RemoveAllOutcome},
    context::AppContext,
    page::CategoryPage,
};
use tracing::info;

use crate::{commands::CliError, config::cart::CartArgs, terminal::TerminalPage};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(flatten)]
    settings: CartArgs,

    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add the test item, creating a cart if there is none
    AddTestItem,

    /// Delete the cart and every item in it
    RemoveAll,

    /// Report whether a cart exists
    Status,
}

pub(crate) async fn run(command: CartCommand, context: AppContext) -> Result<(), CliError> {
    let view = Arc::new(TerminalPage::stdout());
    let controller = CartSyncController::new(context.carts, view, command.settings.settings());

    match command.command {
        CartSubcommand::AddTestItem => {
            let outcome = controller.add_test_item().await?;
            let action = match outcome {
                AddItemOutcome::Created(_) => "created cart",
                AddItemOutcome::Appended(_) => "appended to cart",
            };

            match outcome.cart() {
                Some(cart) => info!("{action} {}, {} item(s)", cart.id, cart.items().count()),
                None => info!("{action}, storefront returned no cart body"),
            }
        }
        CartSubcommand::RemoveAll => match controller.remove_all_items().await? {
            RemoveAllOutcome::Removed(id) => info!("cart {id} removed"),
            RemoveAllOutcome::NoCart => info!("no cart to remove"),
        },
        CartSubcommand::Status => {
            let page = CategoryPage::new(controller, None);
            let has_cart = page.on_ready().await?;

            info!("cart present: {has_cart}");
        }
    }

    Ok(())
}
