//! 依疾病檔案評估入境要求

use crate::domain::model::{IllnessProfile, RequirementRule};
use crate::utils::error::{Result, TrackerError};
use chrono::{Duration, NaiveDate};

/// 有效期限以每月 30 天近似計算
pub const DAYS_PER_MONTH: i64 = 30;

/// 驗證後的規則數值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedRule {
    pub required_doses: u32,
    pub validity_period_months: Option<u32>,
}

/// 規則數值缺失或為負時直接回傳 `InvalidRule`
pub fn check_rule(rule: &RequirementRule) -> Result<CheckedRule> {
    let required_doses = match rule.required_doses {
        None => {
            return Err(TrackerError::invalid_rule(
                rule.country_id,
                rule.illness_id,
                "required_doses is missing",
            ))
        }
        Some(n) if n < 0 => {
            return Err(TrackerError::invalid_rule(
                rule.country_id,
                rule.illness_id,
                format!("required_doses must not be negative (got {})", n),
            ))
        }
        Some(n) => n as u32,
    };

    let validity_period_months = match rule.validity_period_months {
        Some(m) if m < 0 => {
            return Err(TrackerError::invalid_rule(
                rule.country_id,
                rule.illness_id,
                format!("validity_period_months must not be negative (got {})", m),
            ))
        }
        other => other.map(|m| m as u32),
    };

    Ok(CheckedRule {
        required_doses,
        validity_period_months,
    })
}

/// 最後一劑不得早於此日期
pub fn validity_threshold(today: NaiveDate, validity_period_months: u32) -> NaiveDate {
    let days = DAYS_PER_MONTH * i64::from(validity_period_months);
    today
        .checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

/// `profile` 在 `today` 是否滿足 `rule`
///
/// 劑數檢查不看日期；有有效期限時，最後一劑必須不早於 `today - 30 * months` 天。
pub fn is_satisfied(rule: &RequirementRule, profile: &IllnessProfile, today: NaiveDate) -> Result<bool> {
    let checked = check_rule(rule)?;

    let Some(entry) = profile.get(rule.illness_id) else {
        return Ok(false);
    };

    if entry.dose_count < checked.required_doses {
        return Ok(false);
    }

    if let Some(months) = checked.validity_period_months {
        let Some(last_dose_date) = entry.last_dose_date else {
            return Ok(false);
        };

        if last_dose_date < validity_threshold(today, months) {
            return Ok(false);
        }
    }

    Ok(true)
}
