//! Vendors portal: suppliers and the bills they send

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::vendor::{
        Bill, BillQuery, CreateBill, CreateVendor, UpdateBill, UpdateVendor, Vendor, VendorQuery,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct VendorsService {
    repository: Repository,
}

impl VendorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_vendors(&self, query: &VendorQuery) -> AppResult<(Vec<Vendor>, i64)> {
        self.repository.vendors.list(query).await
    }

    pub async fn get_vendor(&self, id: Uuid) -> AppResult<Vendor> {
        self.repository.vendors.get_by_id(id).await
    }

    pub async fn create_vendor(&self, data: CreateVendor) -> AppResult<Vendor> {
        data.validate()?;
        let vendor = self.repository.vendors.create(&data).await?;
        tracing::info!(vendor_id = %vendor.id, name = %vendor.name, "Vendor created");
        Ok(vendor)
    }

    pub async fn update_vendor(&self, id: Uuid, data: UpdateVendor) -> AppResult<Vendor> {
        data.validate()?;
        self.repository.vendors.update(id, &data).await
    }

    pub async fn delete_vendor(&self, id: Uuid) -> AppResult<()> {
        self.repository.vendors.delete(id).await
    }

    pub async fn list_bills(&self, query: &BillQuery) -> AppResult<(Vec<Bill>, i64)> {
        self.repository.bills.list(query).await
    }

    pub async fn get_bill(&self, id: Uuid) -> AppResult<Bill> {
        self.repository.bills.get_by_id(id).await
    }

    pub async fn create_bill(&self, data: CreateBill) -> AppResult<Bill> {
        data.validate()?;
        self.repository.bills.create(&data).await
    }

    pub async fn update_bill(&self, id: Uuid, data: UpdateBill) -> AppResult<Bill> {
        data.validate()?;
        self.repository.bills.update(id, &data).await
    }

    pub async fn delete_bill(&self, id: Uuid) -> AppResult<()> {
        self.repository.bills.delete(id).await
    }
}
