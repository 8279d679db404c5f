//! 接種紀錄彙整

use crate::domain::model::{IllnessProfile, Vaccination, VaccinationRecord, Vaccine};

/// 依 vaccination → vaccine → illness 的關聯，把原始接種紀錄對應到疾病。
///
/// 關聯缺失（沒有疫苗、未知疫苗、疫苗沒有疾病）時產生 `illness_id = None` 的紀錄，
/// 交給 [`build_profile`] 略過。
pub fn resolve_records(vaccinations: &[Vaccination], vaccines: &[Vaccine]) -> Vec<VaccinationRecord> {
    vaccinations
        .iter()
        .map(|v| {
            let illness_id = v
                .vaccine_id
                .and_then(|id| vaccines.iter().find(|vaccine| vaccine.id == id))
                .and_then(|vaccine| vaccine.illness_id);

            if illness_id.is_none() {
                tracing::debug!(
                    "Vaccination {} has no vaccine/illness link (vaccine_id: {:?})",
                    v.id,
                    v.vaccine_id
                );
            }

            VaccinationRecord {
                illness_id,
                dose_dates: v.dates.clone(),
            }
        })
        .collect()
}

/// 依疾病彙整劑數與最後一劑日期
///
/// 沒有疾病關聯的紀錄略過；有關聯但沒有施打日期的紀錄仍建立零劑的項目。
pub fn build_profile(records: &[VaccinationRecord]) -> IllnessProfile {
    let mut profile = IllnessProfile::default();
    let mut skipped = 0usize;

    for record in records {
        let Some(illness_id) = record.illness_id else {
            skipped += 1;
            continue;
        };

        let entry = profile.entry_mut(illness_id);
        for date in &record.dose_dates {
            entry.record_dose(*date);
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} vaccination records without illness link", skipped);
    }

    profile
}
