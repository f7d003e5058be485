use contracts::domain::a004_payslip::aggregate::SalarySlipRequest;

use crate::shared::api_utils::{post_binary, ApiError, Binary};
use crate::shared::export::PDF;

/// Renders one salary slip as a PDF.
pub async fn generate_slip(request: &SalarySlipRequest) -> Result<Binary, ApiError> {
    post_binary("/employee/salaryslip", request, PDF).await
}
