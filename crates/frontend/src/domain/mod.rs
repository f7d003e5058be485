pub mod a001_employee;
pub mod a002_invoice;
pub mod a003_kpi;
pub mod a004_payslip;
pub mod a005_company_settings;
