use async_trait::async_trait;
use contracts::domain::a002_invoice::aggregate::{
    Company, GenerateInvoiceRequest, Invoice, InvoiceIdRequest, InvoiceListRequest, InvoicePage,
    CLIENT_SORTED_FIELDS,
};
use contracts::shared::dates::UNPARSABLE_DATE_KEY;
use contracts::shared::list::{ListQuery, ListResult};
use std::rc::Rc;

use crate::shared::api_utils::{post_binary, post_data, ApiError, Binary};
use crate::shared::export::PDF;
use crate::shared::list_controller::{
    DateSortFallback, ListSource, ListStrategy, ServerPaged, SortRouted,
};

fn endpoint(company: Company, action: &str) -> String {
    format!("{}/{}", company.api_prefix(), action)
}

/// Server-paged `<prefix>/getlist` of one company.
pub struct InvoiceSource {
    company: Company,
}

impl InvoiceSource {
    pub fn new(company: Company) -> Self {
        Self { company }
    }
}

#[async_trait(?Send)]
impl ListSource<Invoice> for InvoiceSource {
    async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<Invoice>, ApiError> {
        let page: InvoicePage = post_data(
            &endpoint(self.company, "getlist"),
            &InvoiceListRequest::from(query),
        )
        .await?;
        Ok(page.into_result(query.page_size))
    }
}

fn date_key(invoice: &Invoice, field: &str) -> i64 {
    invoice.date_key(field).unwrap_or(UNPARSABLE_DATE_KEY)
}

/// Server paging, except for the date columns which the server orders as
/// plain strings.
pub fn invoice_strategy(company: Company) -> Rc<dyn ListStrategy<Invoice>> {
    let source = Rc::new(InvoiceSource::new(company));
    let mut routed: SortRouted<Invoice> = SortRouted::new(Rc::new(ServerPaged::new(source.clone())));
    for field in CLIENT_SORTED_FIELDS {
        routed = routed.route(field, Rc::new(DateSortFallback::new(source.clone(), date_key)));
    }
    Rc::new(routed)
}

/// Full record of one issued invoice.
pub async fn fetch_invoice(company: Company, id: &str) -> Result<Invoice, ApiError> {
    post_data(
        &endpoint(company, "getinvoice"),
        &InvoiceIdRequest { id: id.to_string() },
    )
    .await
}

pub async fn generate_invoice(
    company: Company,
    request: &GenerateInvoiceRequest,
) -> Result<Binary, ApiError> {
    post_binary(&endpoint(company, "generate-invoice"), request, PDF).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_invoice::aggregate::{DUE_DATE, INVOICE_DATE};

    #[test]
    fn endpoints_follow_company_prefix() {
        assert_eq!(endpoint(Company::MhdTech, "getlist"), "/invoiceMHD/getlist");
        assert_eq!(
            endpoint(Company::EnoylityTech, "generate-invoice"),
            "/enoylity/generate-invoice"
        );
    }

    #[test]
    fn missing_dates_sort_first() {
        let invoice = Invoice {
            invoice_date: "not a date".into(),
            due_date: "14-06-2025".into(),
            ..Invoice::default()
        };
        assert_eq!(date_key(&invoice, INVOICE_DATE), UNPARSABLE_DATE_KEY);
        assert_eq!(date_key(&invoice, DUE_DATE), 20250614);
        assert_eq!(date_key(&invoice, "total_amount"), UNPARSABLE_DATE_KEY);
    }

    #[test]
    fn every_client_sorted_field_has_a_date_key() {
        let invoice = Invoice {
            invoice_date: "01-03-2025".into(),
            due_date: "2025-03-31".into(),
            ..Invoice::default()
        };
        for field in CLIENT_SORTED_FIELDS {
            assert_ne!(date_key(&invoice, field), UNPARSABLE_DATE_KEY, "{field}");
        }
    }
}
