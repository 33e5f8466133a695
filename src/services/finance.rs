//! Accounts portal records: invoices, payments, expenses, budgets and
//! pending collections

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::finance::{
        Budget, BudgetQuery, CollectionQuery, CreateBudget, CreateCollection, CreateExpense,
        CreateInvoice, CreatePayment, Expense, ExpenseQuery, Invoice, InvoiceQuery, Payment,
        PaymentQuery, PendingCollection, UpdateBudget, UpdateCollection, UpdateExpense,
        UpdateInvoice, UpdatePayment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct FinanceService {
    repository: Repository,
}

impl FinanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Invoices

    pub async fn list_invoices(&self, query: &InvoiceQuery) -> AppResult<(Vec<Invoice>, i64)> {
        self.repository.invoices.list(query).await
    }

    pub async fn get_invoice(&self, id: Uuid) -> AppResult<Invoice> {
        self.repository.invoices.get_by_id(id).await
    }

    pub async fn create_invoice(&self, data: CreateInvoice) -> AppResult<Invoice> {
        data.validate()?;
        let invoice = self.repository.invoices.create(&data).await?;
        tracing::info!(invoice_id = %invoice.id, number = %invoice.invoice_number, "Invoice created");
        Ok(invoice)
    }

    pub async fn update_invoice(&self, id: Uuid, data: UpdateInvoice) -> AppResult<Invoice> {
        data.validate()?;
        self.repository.invoices.update(id, &data).await
    }

    pub async fn delete_invoice(&self, id: Uuid) -> AppResult<()> {
        self.repository.invoices.delete(id).await
    }

    // Payments

    pub async fn list_payments(&self, query: &PaymentQuery) -> AppResult<(Vec<Payment>, i64)> {
        self.repository.payments.list(query).await
    }

    pub async fn get_payment(&self, id: Uuid) -> AppResult<Payment> {
        self.repository.payments.get_by_id(id).await
    }

    pub async fn create_payment(&self, data: CreatePayment) -> AppResult<Payment> {
        data.validate()?;
        if let Some(invoice_id) = data.invoice_id {
            self.repository.invoices.get_by_id(invoice_id).await?;
        }
        let payment = self.repository.payments.create(&data).await?;
        tracing::info!(payment_id = %payment.id, amount = %payment.amount, "Payment recorded");
        Ok(payment)
    }

    pub async fn update_payment(&self, id: Uuid, data: UpdatePayment) -> AppResult<Payment> {
        data.validate()?;
        if let Some(invoice_id) = data.invoice_id {
            self.repository.invoices.get_by_id(invoice_id).await?;
        }
        self.repository.payments.update(id, &data).await
    }

    pub async fn delete_payment(&self, id: Uuid) -> AppResult<()> {
        self.repository.payments.delete(id).await
    }

    // Expenses

    pub async fn list_expenses(&self, query: &ExpenseQuery) -> AppResult<(Vec<Expense>, i64)> {
        self.repository.expenses.list(query).await
    }

    pub async fn get_expense(&self, id: Uuid) -> AppResult<Expense> {
        self.repository.expenses.get_by_id(id).await
    }

    pub async fn create_expense(&self, data: CreateExpense) -> AppResult<Expense> {
        data.validate()?;
        self.repository.expenses.create(&data).await
    }

    pub async fn update_expense(&self, id: Uuid, data: UpdateExpense) -> AppResult<Expense> {
        data.validate()?;
        self.repository.expenses.update(id, &data).await
    }

    pub async fn delete_expense(&self, id: Uuid) -> AppResult<()> {
        self.repository.expenses.delete(id).await
    }

    // Budgets

    pub async fn list_budgets(&self, query: &BudgetQuery) -> AppResult<(Vec<Budget>, i64)> {
        self.repository.budgets.list(query).await
    }

    pub async fn get_budget(&self, id: Uuid) -> AppResult<Budget> {
        self.repository.budgets.get_by_id(id).await
    }

    pub async fn create_budget(&self, data: CreateBudget) -> AppResult<Budget> {
        data.validate()?;
        self.repository.budgets.create(&data).await
    }

    pub async fn update_budget(&self, id: Uuid, data: UpdateBudget) -> AppResult<Budget> {
        data.validate()?;
        self.repository.budgets.update(id, &data).await
    }

    pub async fn delete_budget(&self, id: Uuid) -> AppResult<()> {
        self.repository.budgets.delete(id).await
    }

    // Pending collections

    pub async fn list_collections(
        &self,
        query: &CollectionQuery,
    ) -> AppResult<(Vec<PendingCollection>, i64)> {
        self.repository.collections.list(query).await
    }

    pub async fn get_collection(&self, id: Uuid) -> AppResult<PendingCollection> {
        self.repository.collections.get_by_id(id).await
    }

    pub async fn create_collection(&self, data: CreateCollection) -> AppResult<PendingCollection> {
        data.validate()?;
        self.repository.collections.create(&data).await
    }

    pub async fn update_collection(
        &self,
        id: Uuid,
        data: UpdateCollection,
    ) -> AppResult<PendingCollection> {
        data.validate()?;
        self.repository.collections.update(id, &data).await
    }

    pub async fn delete_collection(&self, id: Uuid) -> AppResult<()> {
        self.repository.collections.delete(id).await
    }
}
