use serde::{Deserialize, Serialize};

use crate::shared::dates::{date_sort_key, format_dmy};
use crate::shared::lenient;
use crate::shared::list::{ListQuery, ListResult};

/// Invoicing companies; each has its own endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    MhdTech,
    EnoylityStudio,
    EnoylityTech,
}

impl Company {
    pub const ALL: [Company; 3] = [Company::MhdTech, Company::EnoylityStudio, Company::EnoylityTech];

    pub fn key(&self) -> &'static str {
        match self {
            Company::MhdTech => "mhd-tech",
            Company::EnoylityStudio => "enoylity-studio",
            Company::EnoylityTech => "enoylity-media",
        }
    }

    pub fn from_key(key: &str) -> Option<Company> {
        Company::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Company::MhdTech => "MHD Tech",
            Company::EnoylityStudio => "Enoylity Studio",
            Company::EnoylityTech => "Enoylity Tech",
        }
    }

    /// Path prefix of the invoice endpoints.
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Company::MhdTech => "/invoiceMHD",
            Company::EnoylityStudio => "/invoiceEnoylity",
            Company::EnoylityTech => "/enoylity",
        }
    }

    pub fn settings_path(&self) -> &'static str {
        match self {
            Company::MhdTech => "/invoice/settings",
            Company::EnoylityStudio => "/invoiceEnoylity/settings",
            Company::EnoylityTech => "/enoylity/settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    PayPal,
    BankTransfer,
}

impl PaymentMethod {
    pub fn code(&self) -> u8 {
        match self {
            PaymentMethod::PayPal => 0,
            PaymentMethod::BankTransfer => 1,
        }
    }

    pub fn from_code(code: Option<f64>) -> Self {
        match code {
            Some(c) if c == 1.0 => PaymentMethod::BankTransfer,
            _ => PaymentMethod::PayPal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillTo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "quantity")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "quantity")]
    pub price: f64,
}

fn quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient::opt_number(deserializer)?.unwrap_or_default())
}

impl LineItem {
    pub fn amount(&self) -> f64 {
        self.quantity * self.price
    }
}

/// An issued invoice as listed by `<prefix>/getlist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, alias = "_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub bill_to: BillTo,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub payment_method: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl Invoice {
    pub fn payment(&self) -> PaymentMethod {
        PaymentMethod::from_code(self.payment_method)
    }

    /// Server total, or the item sum when the server left it out.
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(LineItem::amount).sum())
    }

    /// Sort key for the date columns; other fields have none.
    pub fn date_key(&self, field: &str) -> Option<i64> {
        match field {
            INVOICE_DATE => Some(date_sort_key(&self.invoice_date)),
            DUE_DATE => Some(date_sort_key(&self.due_date)),
            _ => None,
        }
    }
}

pub const INVOICE_DATE: &str = "invoice_date";
pub const DUE_DATE: &str = "due_date";

/// Fields the server cannot sort reliably; these go through a local sort.
pub const CLIENT_SORTED_FIELDS: [&str; 2] = [INVOICE_DATE, DUE_DATE];

/// Body of `<prefix>/getlist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceListRequest {
    pub search: String,
    #[serde(rename = "sortField")]
    pub sort_field: String,
    #[serde(rename = "sortAsc")]
    pub sort_asc: bool,
    pub page: usize,
    pub per_page: usize,
}

impl From<&ListQuery> for InvoiceListRequest {
    fn from(query: &ListQuery) -> Self {
        Self {
            search: query.search.trim().to_string(),
            sort_field: query.sort_field.clone(),
            sort_asc: query.sort_ascending,
            page: query.page.max(1),
            per_page: query.page_size.max(1),
        }
    }
}

/// `data` of `<prefix>/getlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePage {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl InvoicePage {
    pub fn into_result(self, page_size: usize) -> ListResult<Invoice> {
        ListResult::from_counts(self.invoices, self.total, None, page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceIdRequest {
    pub id: String,
}

/// Body of `<prefix>/generate-invoice`. Dates travel as `DD-MM-YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateInvoiceRequest {
    pub bill_to_name: String,
    pub bill_to_address: String,
    pub bill_to_city: String,
    pub bill_to_email: String,
    pub bill_to_phone: String,
    pub invoice_date: String,
    pub due_date: String,
    pub payment_method: u8,
    #[serde(rename = "bank_Note")]
    pub bank_note: String,
    pub items: Vec<LineItem>,
    pub notes: String,
}

impl GenerateInvoiceRequest {
    /// Pre-fills a new invoice from an existing one.
    pub fn copy_of(invoice: &Invoice) -> Self {
        Self {
            bill_to_name: invoice.bill_to.name.clone(),
            bill_to_address: invoice.bill_to.address.clone(),
            bill_to_city: invoice.bill_to.city.clone(),
            bill_to_email: invoice.bill_to.email.clone(),
            bill_to_phone: invoice.bill_to.phone.clone(),
            invoice_date: format_dmy(&invoice.invoice_date),
            due_date: format_dmy(&invoice.due_date),
            payment_method: invoice.payment().code(),
            bank_note: String::new(),
            items: invoice.items.clone(),
            notes: invoice.notes.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bill_to_name.trim().is_empty() || self.bill_to_address.trim().is_empty() {
            return Err("Client name and address are required".into());
        }
        let (issued, due) = (date_sort_key(&self.invoice_date), date_sort_key(&self.due_date));
        if issued == crate::shared::dates::UNPARSABLE_DATE_KEY
            || due == crate::shared::dates::UNPARSABLE_DATE_KEY
        {
            return Err("Invoice and due dates are required".into());
        }
        if due < issued {
            return Err("Due date cannot be before the invoice date".into());
        }
        if self.items.is_empty() {
            return Err("Add at least one line item".into());
        }
        if self
            .items
            .iter()
            .any(|i| i.description.trim().is_empty() || i.quantity <= 0.0 || i.price < 0.0)
        {
            return Err("Every line item needs a description, a positive quantity and a price".into());
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::amount).sum()
    }

    /// `invoice_<DD-MM-YYYY>.pdf`; the number is only known once the server
    /// has issued the invoice.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .invoice_date
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "invoice.pdf".to_string()
        } else {
            format!("invoice_{stem}.pdf")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(description: &str, quantity: f64, price: f64) -> LineItem {
        LineItem {
            description: description.into(),
            quantity,
            price,
        }
    }

    #[test]
    fn list_request_uses_invoice_wire_names() {
        let mut q = ListQuery::new(INVOICE_DATE, false, 5);
        q.page = 2;
        let body = serde_json::to_value(InvoiceListRequest::from(&q)).unwrap();
        assert_eq!(
            body,
            json!({ "search": "", "sortField": "invoice_date", "sortAsc": false, "page": 2, "per_page": 5 })
        );
    }

    #[test]
    fn invoice_parses_loose_numbers() {
        let inv: Invoice = serde_json::from_value(json!({
            "_id": "65f0",
            "invoice_number": 17,
            "invoice_date": "30-05-2025",
            "due_date": "2025-06-14",
            "items": [{ "description": "Edit", "quantity": "2", "price": 150 }],
            "payment_method": 1
        }))
        .unwrap();
        assert_eq!(inv.id, "65f0");
        assert_eq!(inv.invoice_number, "17");
        assert_eq!(inv.payment(), PaymentMethod::BankTransfer);
        assert_eq!(inv.total(), 300.0);
        assert_eq!(inv.date_key(INVOICE_DATE), Some(20250530));
        assert_eq!(inv.date_key(DUE_DATE), Some(20250614));
        assert_eq!(inv.date_key("invoice_number"), None);
    }

    #[test]
    fn copy_prefills_and_normalizes_dates() {
        let inv = Invoice {
            invoice_date: "2025-05-30".into(),
            due_date: "2025-06-14T00:00:00Z".into(),
            bill_to: BillTo {
                name: "Acme".into(),
                address: "1 Road".into(),
                ..BillTo::default()
            },
            items: vec![item("Design", 1.0, 99.0)],
            ..Invoice::default()
        };
        let req = GenerateInvoiceRequest::copy_of(&inv);
        assert_eq!(req.invoice_date, "30-05-2025");
        assert_eq!(req.due_date, "14-06-2025");
        assert_eq!(req.payment_method, 0);
        assert!(req.validate().is_ok());
        assert_eq!(req.file_name(), "invoice_30-05-2025.pdf");
        assert_eq!(GenerateInvoiceRequest::default().file_name(), "invoice.pdf");
    }

    #[test]
    fn validation_rejects_bad_input() {
        let mut req = GenerateInvoiceRequest {
            bill_to_name: "Acme".into(),
            bill_to_address: "1 Road".into(),
            invoice_date: "10-06-2025".into(),
            due_date: "01-06-2025".into(),
            items: vec![item("Design", 1.0, 10.0)],
            ..GenerateInvoiceRequest::default()
        };
        assert!(req.validate().unwrap_err().contains("Due date"));
        req.due_date = "20-06-2025".into();
        req.items.push(item("", 1.0, 1.0));
        assert!(req.validate().is_err());
        req.items.pop();
        assert!(req.validate().is_ok());
        assert_eq!(req.total(), 10.0);
    }

    #[test]
    fn company_keys() {
        for company in Company::ALL {
            assert_eq!(Company::from_key(company.key()), Some(company));
        }
        assert_eq!(Company::from_key("nope"), None);
    }
}
