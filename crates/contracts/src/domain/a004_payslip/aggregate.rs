use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    pub name: String,
    pub amount: f64,
}

/// Body of `/employee/salaryslip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySlipRequest {
    pub employee_id: String,
    pub lop: String,
    /// Issue date, `DD-MM-YYYY`.
    pub date: String,
    /// `MM-YYYY`.
    pub month: String,
    pub salary_structure: Vec<SalaryComponent>,
    #[serde(rename = "paidDays", skip_serializing_if = "Option::is_none")]
    pub paid_days: Option<String>,
}

/// Raw text of the payslip form; amounts are parsed on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayslipForm {
    pub employee_id: String,
    /// `01`..`12`.
    pub month: String,
    pub year: String,
    pub hra: String,
    pub transport: String,
    pub medical: String,
    pub overtime: String,
    pub bonus: String,
    pub others: String,
    pub lop: String,
    pub paid_days: String,
}

/// Allowance labels the slip template expects, in print order.
pub const ALLOWANCES: [&str; 6] = [
    "House Rent Allowance",
    "Conveyance Allowance",
    "MED ALL",
    "Overtime Bonas",
    "Performance Bonas",
    "OTH ALL",
];

fn amount(raw: &str, label: &str) -> Result<f64, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(n) if n >= 0.0 && n.is_finite() => Ok(n),
        _ => Err(format!("{label} must be a non-negative number")),
    }
}

impl PayslipForm {
    pub fn to_request(&self, today: NaiveDate) -> Result<SalarySlipRequest, String> {
        if self.employee_id.trim().is_empty() {
            return Err("Please select an employee".into());
        }
        let month: u32 = self
            .month
            .trim()
            .parse()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or("Please select a month")?;
        let year: i32 = self
            .year
            .trim()
            .parse()
            .ok()
            .filter(|y| (2000..=2100).contains(y))
            .ok_or("Please select a year")?;

        let raw = [
            &self.hra,
            &self.transport,
            &self.medical,
            &self.overtime,
            &self.bonus,
            &self.others,
        ];
        let salary_structure = ALLOWANCES
            .iter()
            .zip(raw)
            .map(|(name, value)| {
                Ok(SalaryComponent {
                    name: name.to_string(),
                    amount: amount(value, name)?,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        amount(&self.lop, "Loss of pay")?;
        let paid_days = self.paid_days.trim();
        if !paid_days.is_empty() {
            match paid_days.parse::<u32>() {
                Ok(d) if d <= 31 => {}
                _ => return Err("Paid days must be between 0 and 31".into()),
            }
        }

        Ok(SalarySlipRequest {
            employee_id: self.employee_id.trim().to_string(),
            lop: self.lop.trim().to_string(),
            date: today.format("%d-%m-%Y").to_string(),
            month: format!("{month:02}-{year}"),
            salary_structure,
            paid_days: (!paid_days.is_empty()).then(|| paid_days.to_string()),
        })
    }
}

pub fn slip_file_name(employee_id: &str) -> String {
    format!("salary_slip_{employee_id}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PayslipForm {
        PayslipForm {
            employee_id: "E7".into(),
            month: "3".into(),
            year: "2025".into(),
            hra: "1500".into(),
            bonus: "250.5".into(),
            ..PayslipForm::default()
        }
    }

    #[test]
    fn builds_request_with_all_allowances() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let req = form().to_request(today).unwrap();
        assert_eq!(req.month, "03-2025");
        assert_eq!(req.date, "02-04-2025");
        assert_eq!(req.salary_structure.len(), ALLOWANCES.len());
        assert_eq!(req.salary_structure[0].amount, 1500.0);
        assert_eq!(req.salary_structure[4].amount, 250.5);
        assert_eq!(req.salary_structure[2].amount, 0.0);
        assert_eq!(req.paid_days, None);
    }

    #[test]
    fn rejects_missing_selection_and_bad_amounts() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let mut f = form();
        f.month = "13".into();
        assert_eq!(f.to_request(today).unwrap_err(), "Please select a month");
        f = form();
        f.employee_id.clear();
        assert!(f.to_request(today).is_err());
        f = form();
        f.medical = "-5".into();
        assert!(f.to_request(today).unwrap_err().contains("MED ALL"));
        f = form();
        f.paid_days = "40".into();
        assert!(f.to_request(today).is_err());
    }

    #[test]
    fn file_name() {
        assert_eq!(slip_file_name("E7"), "salary_slip_E7.pdf");
    }
}
