use std::sync::Arc;

use tallybook_ledger::LedgerService;
use tallybook_store::TransactionStore;

/// Shared application services handed to route handlers via `Extension`.
pub struct AppServices {
    ledger: LedgerService,
}

impl AppServices {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            ledger: LedgerService::new(store),
        }
    }

    pub fn ledger(&self) -> &LedgerService {
        &self.ledger
    }
}
