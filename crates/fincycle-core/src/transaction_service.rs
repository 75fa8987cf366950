use uuid::Uuid;

use fincycle_domain::Transaction;

use crate::CoreError;

/// Collection-level transaction edits. Records are only ever replaced whole.
pub struct TransactionService;

impl TransactionService {
    pub fn add(transactions: &mut Vec<Transaction>, transaction: Transaction) -> Result<Uuid, CoreError> {
        transaction.validate()?;
        if Self::find(transactions, transaction.id).is_some() {
            return Err(CoreError::Validation(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }
        let id = transaction.id;
        transactions.push(transaction);
        Ok(id)
    }

    /// Replaces the record sharing `replacement.id`.
    pub fn update(transactions: &mut [Transaction], replacement: Transaction) -> Result<(), CoreError> {
        replacement.validate()?;
        let slot = transactions
            .iter_mut()
            .find(|txn| txn.id == replacement.id)
            .ok_or(CoreError::TransactionNotFound(replacement.id))?;
        *slot = replacement;
        Ok(())
    }

    pub fn remove(transactions: &mut Vec<Transaction>, id: Uuid) -> Result<Transaction, CoreError> {
        let index = transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        Ok(transactions.remove(index))
    }

    pub fn find(transactions: &[Transaction], id: Uuid) -> Option<&Transaction> {
        transactions.iter().find(|txn| txn.id == id)
    }
}
