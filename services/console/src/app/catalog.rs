//! services/console/src/app/catalog.rs
//!
//! Product list, modal opening, and the create/update/delete calls.

use catalog_core::domain::{Product, ProductDraft};
use catalog_core::form::PendingAction;
use catalog_core::modal::ModalMode;
use tracing::{error, info};

use crate::app::state::Console;
use crate::error::ConsoleError;

impl Console {
    /// Fetches every product. On failure the current list is left as it was.
    pub async fn refresh_products(&mut self) -> Result<(), ConsoleError> {
        let products = self.services.products.list(&self.ctx).await?;
        info!(count = products.len(), "Product list loaded");
        self.state.products = products;
        Ok(())
    }

    /// Opens the dialog on the empty template.
    pub fn open_create(&mut self) -> Result<(), ConsoleError> {
        self.require_session()?;
        self.state.editor.open(ModalMode::Create, None);
        Ok(())
    }

    /// Opens the dialog on the product shown at `row` (1-based).
    pub fn open_row(&mut self, mode: ModalMode, row: usize) -> Result<(), ConsoleError> {
        self.require_session()?;
        let product: Product = row
            .checked_sub(1)
            .and_then(|index| self.state.products.get(index))
            .cloned()
            .ok_or(ConsoleError::NoSuchRow(row))?;
        self.state.editor.open(mode, Some(&product));
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.state.editor.close();
    }

    /// Creates (`ModalMode::Create`) or replaces (`ModalMode::Edit`) a product.
    ///
    /// Prices and the enabled flag are coerced and empty image slots dropped
    /// before anything is sent.
    pub async fn upsert(
        &mut self,
        mode: ModalMode,
        id: &str,
        draft: &ProductDraft,
    ) -> Result<(), ConsoleError> {
        let payload = draft.to_payload()?;
        let action = match mode {
            ModalMode::Create => PendingAction::Create(payload),
            ModalMode::Edit => PendingAction::Update {
                id: id.to_string(),
                payload,
            },
            other => return Err(ConsoleError::InvalidMode(other)),
        };
        self.execute(action).await
    }

    /// Deletes the product with `id`.
    pub async fn delete_product(&mut self, id: &str) -> Result<(), ConsoleError> {
        self.execute(PendingAction::Delete { id: id.to_string() })
            .await
    }

    /// Runs whatever the open dialog's confirm button stands for.
    pub async fn confirm(&mut self) -> Result<(), ConsoleError> {
        self.require_session()?;
        match self.state.editor.confirm()? {
            PendingAction::Delete { id } => self.delete_product(&id).await,
            action => self.execute(action).await,
        }
    }

    /// Sends a mutation; on success closes the dialog and reloads the list.
    /// On failure the dialog stays open so the user can retry. Once the
    /// server has applied the change a failed reload is reported on its own
    /// and the mutation still counts as done.
    async fn execute(&mut self, action: PendingAction) -> Result<(), ConsoleError> {
        let repository = self.services.products.clone();
        let done = match &action {
            PendingAction::Create(payload) => {
                repository.create(&self.ctx, payload).await?;
                format!("Created \"{}\"", payload.title)
            }
            PendingAction::Update { id, payload } => {
                repository.update(&self.ctx, id, payload).await?;
                format!("Updated \"{}\"", payload.title)
            }
            PendingAction::Delete { id } => {
                repository.delete(&self.ctx, id).await?;
                format!("Deleted product {}", id)
            }
        };
        info!("{}", done);
        self.state.editor.close();
        self.state.push_info(done);
        self.load_products_or_report().await;
        Ok(())
    }

    pub(crate) async fn load_products_or_report(&mut self) {
        if let Err(e) = self.refresh_products().await {
            self.report("Failed to load products", &e);
        }
    }

    /// Logs a failed action and queues it for display.
    pub(crate) fn report(&mut self, action: &str, err: &ConsoleError) {
        error!("{}: {}", action, err);
        self.state
            .push_error(format!("{}: {}", action, err.user_message()));
    }

    fn require_session(&self) -> Result<(), ConsoleError> {
        if self.state.is_authenticated() {
            Ok(())
        } else {
            Err(ConsoleError::NotSignedIn)
        }
    }
}
