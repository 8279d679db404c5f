//! 每個國家的入境要求彙整

use crate::core::evaluator::{check_rule, is_satisfied};
use crate::domain::model::{
    Country, CountryStatus, IllnessProfile, ReferenceData, RequirementCheck, RequirementRule,
    StatusMode,
};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

fn satisfied_count<'a, I>(rules: I, profile: &IllnessProfile, today: NaiveDate) -> Result<(u32, u32)>
where
    I: IntoIterator<Item = &'a RequirementRule>,
{
    let mut total = 0u32;
    let mut satisfied = 0u32;
    for rule in rules {
        total += 1;
        if is_satisfied(rule, profile, today)? {
            satisfied += 1;
        }
    }
    Ok((satisfied, total))
}

/// 未滿足的要求數；沒有要求時為 0
pub fn country_missing_count<'a, I>(rules: I, profile: &IllnessProfile, today: NaiveDate) -> Result<u32>
where
    I: IntoIterator<Item = &'a RequirementRule>,
{
    let (satisfied, total) = satisfied_count(rules, profile, today)?;
    Ok(total - satisfied)
}

/// 已滿足要求的百分比（0 到 100）；沒有要求時為 100
///
/// 四捨五入：8 條中 1 條為 13，3 條中 2 條為 67。
pub fn country_percent_satisfied<'a, I>(
    rules: I,
    profile: &IllnessProfile,
    today: NaiveDate,
) -> Result<u32>
where
    I: IntoIterator<Item = &'a RequirementRule>,
{
    let (satisfied, total) = satisfied_count(rules, profile, today)?;
    if total == 0 {
        return Ok(100);
    }
    Ok(percent_half_up(satisfied, total))
}

fn percent_half_up(part: u32, total: u32) -> u32 {
    let (part, total) = (u64::from(part), u64::from(total));
    ((200 * part + total) / (2 * total)) as u32
}

/// 以 ISO 代碼彙整每個國家的狀態，沒有任何要求的國家也會列出
pub fn country_statuses(
    countries: &[Country],
    rules: &[RequirementRule],
    profile: &IllnessProfile,
    today: NaiveDate,
    mode: StatusMode,
) -> Result<CountryStatus> {
    let mut by_country: HashMap<i64, Vec<&RequirementRule>> = HashMap::new();
    for rule in rules {
        // 所有規則都先驗證，包含對應不到國家的規則
        check_rule(rule)?;
        if !countries.iter().any(|c| c.id == rule.country_id) {
            tracing::warn!("Requirement refers to unknown country {}", rule.country_id);
        }
        by_country.entry(rule.country_id).or_default().push(rule);
    }

    let mut values = BTreeMap::new();
    for country in countries {
        let country_rules = by_country.get(&country.id).map(Vec::as_slice).unwrap_or(&[]);
        let value = match mode {
            StatusMode::Missing => {
                country_missing_count(country_rules.iter().copied(), profile, today)?
            }
            StatusMode::Percent => {
                country_percent_satisfied(country_rules.iter().copied(), profile, today)?
            }
        };
        tracing::debug!(
            "{} ({}): {} rules, {} = {}",
            country.iso_code,
            country.name,
            country_rules.len(),
            mode,
            value
        );
        values.insert(country.iso_code.clone(), value);
    }

    Ok(CountryStatus { mode, values })
}

/// 每條入境要求的明細，依國家 ISO 代碼及疾病名稱排序
pub fn requirement_checks(
    reference: &ReferenceData,
    profile: &IllnessProfile,
    today: NaiveDate,
) -> Result<Vec<RequirementCheck>> {
    let mut checks = Vec::with_capacity(reference.requirements.len());

    for rule in &reference.requirements {
        let checked = check_rule(rule)?;
        let satisfied = is_satisfied(rule, profile, today)?;

        let (country_iso_code, country_name) = match reference.country(rule.country_id) {
            Some(c) => (c.iso_code.clone(), c.name.clone()),
            None => {
                tracing::warn!("Requirement refers to unknown country {}", rule.country_id);
                (rule.country_id.to_string(), rule.country_id.to_string())
            }
        };
        let illness_name = reference
            .illness(rule.illness_id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| rule.illness_id.to_string());

        let entry = profile.get(rule.illness_id);
        checks.push(RequirementCheck {
            country_iso_code,
            country_name,
            illness_name,
            required_doses: checked.required_doses,
            validity_period_months: checked.validity_period_months,
            dose_count: entry.map(|e| e.dose_count).unwrap_or(0),
            last_dose_date: entry.and_then(|e| e.last_dose_date),
            satisfied,
        });
    }

    checks.sort_by(|a, b| {
        a.country_iso_code
            .cmp(&b.country_iso_code)
            .then_with(|| a.illness_name.cmp(&b.illness_name))
    });

    Ok(checks)
}
