use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::a002_invoice::aggregate::Company;

/// Invoice letterhead settings of one company, normalized across the two
/// shapes the settings endpoints use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySettings {
    pub company_name: String,
    pub tagline: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub logo_url: String,
}

fn text(value: &Value, path: &[&str]) -> String {
    let mut cursor = value;
    for key in path {
        match cursor.get(key) {
            Some(next) => cursor = next,
            None => return String::new(),
        }
    }
    match cursor {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl CompanySettings {
    /// Reads either `{company_info, logo_path}` or
    /// `{company_details, assets}`.
    pub fn from_wire(data: &Value) -> Self {
        if data.get("company_info").is_some() {
            return Self {
                company_name: text(data, &["company_info", "name"]),
                tagline: text(data, &["company_info", "tagline"]),
                address: text(data, &["company_info", "address"]),
                email: text(data, &["company_info", "email"]),
                phone: text(data, &["company_info", "phone"]),
                website: text(data, &["company_info", "youtube"]),
                logo_url: text(data, &["logo_path"]),
            };
        }
        Self {
            company_name: text(data, &["company_details", "company_name"]),
            tagline: text(data, &["company_details", "tagline"]),
            address: text(data, &["company_details", "company_address"]),
            email: text(data, &["company_details", "company_email"]),
            phone: text(data, &["company_details", "company_phone"]),
            website: text(data, &["company_details", "website"]),
            logo_url: text(data, &["assets", "logo_url"]),
        }
    }

    /// The body shape the given company's settings endpoint expects.
    pub fn to_wire(&self, company: Company) -> Value {
        match company {
            Company::MhdTech => json!({
                "company_info": {
                    "name": self.company_name,
                    "tagline": self.tagline,
                    "address": self.address,
                    "email": self.email,
                    "phone": self.phone,
                    "youtube": self.website,
                },
                "logo_path": self.logo_url,
            }),
            Company::EnoylityStudio | Company::EnoylityTech => json!({
                "company_details": {
                    "company_name": self.company_name,
                    "tagline": self.tagline,
                    "company_address": self.address,
                    "company_email": self.email,
                    "company_phone": self.phone,
                    "website": self.website,
                },
                "assets": { "logo_url": self.logo_url },
            }),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.company_name.trim().is_empty() {
            return Err("Company name is required".into());
        }
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            return Err("Company email looks invalid".into());
        }
        Ok(())
    }
}

/// Response of the logo upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoUploadResponse {
    #[serde(default)]
    pub logo_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_shapes() {
        let mhd = CompanySettings::from_wire(&json!({
            "company_info": { "name": "MHD", "address": "Pune", "phone": 98450, "youtube": "yt.com/mhd" },
            "logo_path": "mhd.png"
        }));
        assert_eq!(mhd.company_name, "MHD");
        assert_eq!(mhd.phone, "98450");
        assert_eq!(mhd.website, "yt.com/mhd");
        assert_eq!(mhd.logo_url, "mhd.png");

        let studio = CompanySettings::from_wire(&json!({
            "company_details": { "company_name": "Enoylity", "company_email": "hi@en.co" },
            "assets": { "logo_url": "https://cdn/logo.png" }
        }));
        assert_eq!(studio.company_name, "Enoylity");
        assert_eq!(studio.email, "hi@en.co");
        assert_eq!(studio.logo_url, "https://cdn/logo.png");
        assert_eq!(studio.address, "");
    }

    #[test]
    fn writes_company_specific_shape() {
        let s = CompanySettings {
            company_name: "X".into(),
            website: "x.io".into(),
            ..CompanySettings::default()
        };
        let mhd = s.to_wire(Company::MhdTech);
        assert_eq!(mhd["company_info"]["youtube"], "x.io");
        let tech = s.to_wire(Company::EnoylityTech);
        assert_eq!(tech["company_details"]["website"], "x.io");
        assert_eq!(CompanySettings::from_wire(&tech), s);
    }

    #[test]
    fn validation() {
        assert!(CompanySettings::default().validate().is_err());
        let mut s = CompanySettings {
            company_name: "X".into(),
            email: "nope".into(),
            ..CompanySettings::default()
        };
        assert!(s.validate().is_err());
        s.email = "a@b.c".into();
        assert!(s.validate().is_ok());
    }
}
