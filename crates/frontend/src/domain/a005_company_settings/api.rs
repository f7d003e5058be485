use contracts::domain::a002_invoice::aggregate::Company;
use contracts::domain::a005_company_settings::aggregate::{CompanySettings, LogoUploadResponse};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::shared::api_utils::{get_plain, post_form, post_plain, ApiError};

/// Multipart field the upload endpoint reads the image from.
const LOGO_FIELD: &str = "file";

fn logo_path(company: Company) -> String {
    format!("/invoiceEnoylity/upload-logo/{}", company.key())
}

pub async fn fetch_settings(company: Company) -> Result<CompanySettings, ApiError> {
    let raw: Value = get_plain(company.settings_path()).await?;
    Ok(CompanySettings::from_wire(&raw))
}

pub async fn save_settings(company: Company, settings: &CompanySettings) -> Result<(), ApiError> {
    post_plain(company.settings_path(), &settings.to_wire(company)).await
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Malformed(format!("{:?}", e))
}

/// Uploads a logo image and returns the URL the server stored it under.
pub async fn upload_logo(company: Company, file: web_sys::File) -> Result<String, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(LOGO_FIELD, &file, &file.name())
        .map_err(js_error)?;
    let reply: LogoUploadResponse = post_form(&logo_path(company), form).await?;
    if reply.logo_url.is_empty() {
        return Err(ApiError::Malformed("upload reply has no logo_url".into()));
    }
    log::info!("logo uploaded for {}: {}", company.key(), reply.logo_url);
    Ok(reply.logo_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_path_uses_company_key() {
        assert_eq!(
            logo_path(Company::EnoylityTech),
            "/invoiceEnoylity/upload-logo/enoylity-media"
        );
    }
}
