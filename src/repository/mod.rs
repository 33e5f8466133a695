//! Repository layer for database operations

pub mod bills;
pub mod budgets;
pub mod collections;
pub mod expenses;
pub mod invoices;
pub mod leads;
pub mod payments;
pub mod profiles;
pub mod registrations;
pub mod vendors;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub registrations: registrations::RegistrationsRepository,
    pub leads: leads::LeadsRepository,
    pub profiles: profiles::ProfilesRepository,
    pub invoices: invoices::InvoicesRepository,
    pub payments: payments::PaymentsRepository,
    pub expenses: expenses::ExpensesRepository,
    pub budgets: budgets::BudgetsRepository,
    pub collections: collections::CollectionsRepository,
    pub vendors: vendors::VendorsRepository,
    pub bills: bills::BillsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            registrations: registrations::RegistrationsRepository::new(pool.clone()),
            leads: leads::LeadsRepository::new(pool.clone()),
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            invoices: invoices::InvoicesRepository::new(pool.clone()),
            payments: payments::PaymentsRepository::new(pool.clone()),
            expenses: expenses::ExpensesRepository::new(pool.clone()),
            budgets: budgets::BudgetsRepository::new(pool.clone()),
            collections: collections::CollectionsRepository::new(pool.clone()),
            vendors: vendors::VendorsRepository::new(pool.clone()),
            bills: bills::BillsRepository::new(pool.clone()),
            pool,
        }
    }
}
