//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, dashboard, faq, finance, health, leads, profiles, registrations, vendors,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Basecamp API",
        version = "1.0.0",
        description = "Outdoor education bookings and administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::portal,
        // Registrations
        registrations::list_programs,
        registrations::quote,
        registrations::submit_registration,
        registrations::list_registrations,
        registrations::get_registration,
        registrations::update_registration,
        registrations::check_in,
        // Leads
        leads::list_leads,
        leads::update_lead,
        // Profiles
        profiles::list_profiles,
        profiles::create_profile,
        profiles::update_access,
        // Accounts
        dashboard::get_dashboard,
        finance::list_invoices,
        finance::get_invoice,
        finance::create_invoice,
        finance::update_invoice,
        finance::delete_invoice,
        finance::list_payments,
        finance::get_payment,
        finance::create_payment,
        finance::update_payment,
        finance::delete_payment,
        finance::list_expenses,
        finance::get_expense,
        finance::create_expense,
        finance::update_expense,
        finance::delete_expense,
        finance::list_budgets,
        finance::get_budget,
        finance::create_budget,
        finance::update_budget,
        finance::delete_budget,
        finance::list_collections,
        finance::get_collection,
        finance::create_collection,
        finance::update_collection,
        finance::delete_collection,
        // Vendors
        vendors::list_vendors,
        vendors::get_vendor,
        vendors::create_vendor,
        vendors::update_vendor,
        vendors::delete_vendor,
        vendors::list_bills,
        vendors::get_bill,
        vendors::create_bill,
        vendors::update_bill,
        vendors::delete_bill,
        // FAQ
        faq::ask,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ProfileInfo,
            auth::PortalResponse,
            crate::models::user::Portal,
            crate::models::user::Profile,
            crate::models::user::CreateProfile,
            crate::models::user::UpdateProfileAccess,
            crate::models::enums::Role,
            // Booking
            crate::models::enums::ProgramKind,
            crate::models::enums::PaymentStatus,
            crate::models::enums::PaymentMethod,
            crate::booking::ProgramDefinition,
            crate::booking::PriceBasis,
            crate::booking::RateTable,
            crate::booking::SessionKind,
            crate::booking::AgeBracket,
            crate::booking::FormQuote,
            crate::models::registration::ChildInput,
            crate::models::registration::Child,
            crate::models::registration::CreateRegistration,
            crate::models::registration::QuoteRequest,
            crate::models::registration::Registration,
            crate::models::registration::RegistrationQuery,
            crate::models::registration::UpdateRegistration,
            crate::services::registrations::SubmissionOutcome,
            crate::services::registrations::EmailDelivery,
            // Leads
            crate::models::enums::LeadStatus,
            crate::models::lead::Lead,
            crate::models::lead::LeadQuery,
            crate::models::lead::UpdateLead,
            // Accounts
            crate::models::dashboard::AccountsDashboard,
            crate::models::dashboard::RecentTransaction,
            crate::models::dashboard::TransactionSource,
            crate::models::dashboard::BudgetUtilization,
            crate::models::enums::InvoiceStatus,
            crate::models::enums::TransactionStatus,
            crate::models::enums::ExpenseStatus,
            crate::models::enums::BudgetStatus,
            crate::models::enums::CollectionStatus,
            crate::models::finance::Invoice,
            crate::models::finance::CreateInvoice,
            crate::models::finance::UpdateInvoice,
            crate::models::finance::InvoiceQuery,
            crate::models::finance::Payment,
            crate::models::finance::CreatePayment,
            crate::models::finance::UpdatePayment,
            crate::models::finance::PaymentQuery,
            crate::models::finance::Expense,
            crate::models::finance::CreateExpense,
            crate::models::finance::UpdateExpense,
            crate::models::finance::ExpenseQuery,
            crate::models::finance::Budget,
            crate::models::finance::CreateBudget,
            crate::models::finance::UpdateBudget,
            crate::models::finance::BudgetQuery,
            crate::models::finance::PendingCollection,
            crate::models::finance::CreateCollection,
            crate::models::finance::UpdateCollection,
            crate::models::finance::CollectionQuery,
            // Vendors
            crate::models::enums::VendorStatus,
            crate::models::enums::BillStatus,
            crate::models::vendor::Vendor,
            crate::models::vendor::CreateVendor,
            crate::models::vendor::UpdateVendor,
            crate::models::vendor::VendorQuery,
            crate::models::vendor::Bill,
            crate::models::vendor::CreateBill,
            crate::models::vendor::UpdateBill,
            crate::models::vendor::BillQuery,
            // FAQ
            faq::AskRequest,
            crate::services::faq::FaqAnswer,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff sign-in and portal dispatch"),
        (name = "registrations", description = "Programs, quotes and registrations"),
        (name = "leads", description = "Lead CRM"),
        (name = "profiles", description = "Staff profile administration"),
        (name = "accounts", description = "Accounts portal"),
        (name = "vendors", description = "Vendors portal"),
        (name = "faq", description = "FAQ bot")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
