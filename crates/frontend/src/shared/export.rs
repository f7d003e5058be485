//! Browser file delivery for binary API responses (PDF slips, CSV exports).

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::shared::api_utils::Binary;

pub const PDF: &str = "application/pdf";
pub const CSV: &str = "text/csv";

/// Creates a Blob from raw bytes.
fn create_blob(bytes: &[u8], mime: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes).into());

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn mime_of(binary: &Binary, fallback: &str) -> String {
    if binary.content_type.is_empty() {
        fallback.to_string()
    } else {
        binary.content_type.clone()
    }
}

/// Triggers a browser download of the Blob.
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    Ok(())
}

pub fn save_file(binary: &Binary, fallback_mime: &str, filename: &str) -> Result<(), String> {
    let blob = create_blob(&binary.bytes, &mime_of(binary, fallback_mime))?;
    download_blob(&blob, filename)
}

/// Opens a PDF in a new browser tab. The object URL stays alive for the tab.
pub fn open_file(binary: &Binary, fallback_mime: &str) -> Result<(), String> {
    let blob = create_blob(&binary.bytes, &mime_of(binary, fallback_mime))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;
    let window = web_sys::window().ok_or("No window object")?;
    window
        .open_with_url_and_target(&url, "_blank")
        .map_err(|e| format!("Failed to open window: {:?}", e))?;
    Ok(())
}

/// `kpi_export_all_2025-04-02.csv`
pub fn dated_file_name(stem: &str, date: chrono::NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_carry_the_date() {
        let d = chrono::NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        assert_eq!(dated_file_name("kpi_export_all", d, "csv"), "kpi_export_all_2025-04-02.csv");
    }

    #[test]
    fn empty_content_type_uses_fallback() {
        let b = Binary {
            content_type: String::new(),
            bytes: vec![1],
        };
        assert_eq!(mime_of(&b, PDF), PDF);
        let b = Binary {
            content_type: "text/csv; charset=utf-8".into(),
            bytes: vec![1],
        };
        assert_eq!(mime_of(&b, PDF), "text/csv; charset=utf-8");
    }
}
