use crate::domain::model::{UserId, Vaccination, VaccinationId, VaccineId};
use crate::utils::error::{Result, TrackerError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DOSE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析施打日期，只接受 YYYY-MM-DD
pub fn parse_dose_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DOSE_DATE_FORMAT).map_err(|_| TrackerError::ValidationError {
        message: format!("Date must be in the format YYYY-MM-DD (got '{}')", trimmed),
    })
}

/// `vaccinations.csv` 的一列：每個施打日期一列，沒有日期的接種保留空白
#[derive(Debug, Clone, Deserialize)]
pub struct VaccinationRow {
    pub vaccination_id: VaccinationId,
    pub user_id: UserId,
    pub vaccine_id: Option<VaccineId>,
    pub status: String,
    pub date: Option<String>,
}

/// 依 id 把每劑一列的資料合併成 [`Vaccination`]，只保留 `user_id` 的資料列
pub fn group_vaccination_rows(rows: Vec<VaccinationRow>, user_id: UserId) -> Result<Vec<Vaccination>> {
    let mut grouped: BTreeMap<VaccinationId, Vaccination> = BTreeMap::new();

    for row in rows.into_iter().filter(|r| r.user_id == user_id) {
        let date = match row.date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_dose_date(s)?),
            _ => None,
        };

        let vaccination = grouped.entry(row.vaccination_id).or_insert_with(|| Vaccination {
            id: row.vaccination_id,
            user_id: row.user_id,
            vaccine_id: row.vaccine_id,
            status: row.status.clone(),
            dates: Vec::new(),
        });

        if vaccination.vaccine_id != row.vaccine_id {
            tracing::warn!(
                "Vaccination {} lists different vaccines ({:?} vs {:?}), keeping the first",
                row.vaccination_id,
                vaccination.vaccine_id,
                row.vaccine_id
            );
        }

        if let Some(date) = date {
            vaccination.dates.push(date);
        }
    }

    for vaccination in grouped.values_mut() {
        vaccination.dates.sort();
    }

    Ok(grouped.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, user_id: i64, vaccine_id: Option<i64>, date: Option<&str>) -> VaccinationRow {
        VaccinationRow {
            vaccination_id: id,
            user_id,
            vaccine_id,
            status: "completed".to_string(),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_dose_date() {
        assert_eq!(
            parse_dose_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        for bad in ["29.02.2024", "2023-02-29", "2024/01/01", ""] {
            let err = parse_dose_date(bad).unwrap_err();
            assert!(err.to_string().contains("YYYY-MM-DD"), "{}", bad);
        }
    }

    #[test]
    fn test_group_rows_per_vaccination_and_user() {
        let rows = vec![
            row(2, 1, Some(10), Some("2024-03-01")),
            row(1, 1, Some(11), Some("2023-01-01")),
            row(2, 1, Some(10), Some("2024-01-01")),
            row(3, 2, Some(10), Some("2024-01-01")),
            row(4, 1, None, None),
        ];

        let vaccinations = group_vaccination_rows(rows, 1).unwrap();

        assert_eq!(vaccinations.len(), 3);
        assert_eq!(vaccinations[0].id, 1);
        assert_eq!(vaccinations[1].dates.len(), 2);
        assert!(vaccinations[1].dates[0] < vaccinations[1].dates[1]);
        assert_eq!(vaccinations[2].vaccine_id, None);
        assert!(vaccinations[2].dates.is_empty());
    }

    #[test]
    fn test_bad_date_in_rows_is_rejected() {
        let rows = vec![row(1, 1, Some(10), Some("01.01.2024"))];
        assert!(matches!(
            group_vaccination_rows(rows, 1),
            Err(TrackerError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_other_users_bad_dates_are_ignored() {
        let rows = vec![row(1, 2, Some(10), Some("not a date")), row(2, 1, Some(10), None)];
        assert_eq!(group_vaccination_rows(rows, 1).unwrap().len(), 1);
    }
}
