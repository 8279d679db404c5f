use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type CountryId = i64;
pub type IllnessId = i64;
pub type VaccineId = i64;
pub type VaccinationId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Illness {
    pub id: IllnessId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    pub id: VaccineId,
    pub name: String,
    pub manufacturer: String,
    pub illness_id: Option<IllnessId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// ISO 3166 alpha-3, 例如 "DEU"
    pub iso_code: String,
    pub name: String,
}

/// 某國對某疾病的入境疫苗要求
///
/// `required_doses` 必填且不可為負；`validity_period_months` 為空代表沒有有效期限。
/// 欄位保留原始資料型別，由評估器在使用前驗證。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRule {
    pub country_id: CountryId,
    pub illness_id: IllnessId,
    pub required_doses: Option<i32>,
    pub validity_period_months: Option<i32>,
}

impl RequirementRule {
    pub fn new(
        country_id: CountryId,
        illness_id: IllnessId,
        required_doses: i32,
        validity_period_months: Option<i32>,
    ) -> Self {
        Self {
            country_id,
            illness_id,
            required_doses: Some(required_doses),
            validity_period_months,
        }
    }
}

/// 使用者登錄的一筆疫苗接種，可有多個施打日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccination {
    pub id: VaccinationId,
    pub user_id: UserId,
    pub vaccine_id: Option<VaccineId>,
    pub status: String,
    pub dates: Vec<NaiveDate>,
}

/// 已對應到疾病的接種紀錄；`illness_id` 為 `None` 表示疫苗或疾病關聯缺失
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationRecord {
    pub illness_id: Option<IllnessId>,
    pub dose_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IllnessEntry {
    pub dose_count: u32,
    pub last_dose_date: Option<NaiveDate>,
}

impl IllnessEntry {
    pub(crate) fn record_dose(&mut self, date: NaiveDate) {
        self.dose_count += 1;
        if self.last_dose_date.map_or(true, |last| date > last) {
            self.last_dose_date = Some(date);
        }
    }
}

/// 單一使用者每種疾病的劑數彙整；缺少的疾病與零劑視為相同
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IllnessProfile {
    entries: BTreeMap<IllnessId, IllnessEntry>,
}

impl IllnessProfile {
    pub fn get(&self, illness_id: IllnessId) -> Option<&IllnessEntry> {
        self.entries.get(&illness_id)
    }

    /// 缺少的疾病視為零劑
    pub fn dose_count(&self, illness_id: IllnessId) -> u32 {
        self.get(illness_id).map(|e| e.dose_count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry_mut(&mut self, illness_id: IllnessId) -> &mut IllnessEntry {
        self.entries.entry(illness_id).or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusMode {
    /// 每國未滿足的要求數
    #[default]
    Missing,
    /// 每國已滿足要求的百分比
    Percent,
}

impl StatusMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMode::Missing => "missing",
            StatusMode::Percent => "percent",
        }
    }
}

impl fmt::Display for StatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "missing" => Ok(StatusMode::Missing),
            "percent" => Ok(StatusMode::Percent),
            other => Err(format!(
                "unknown status mode '{}', expected 'missing' or 'percent'",
                other
            )),
        }
    }
}

/// ISO 代碼 → 未滿足數或百分比，依 `mode` 而定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryStatus {
    pub mode: StatusMode,
    pub values: BTreeMap<String, u32>,
}

impl CountryStatus {
    pub fn get(&self, iso_code: &str) -> Option<u32> {
        self.values.get(iso_code).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 單一入境要求與使用者紀錄的比對結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementCheck {
    pub country_iso_code: String,
    pub country_name: String,
    pub illness_name: String,
    pub required_doses: u32,
    pub validity_period_months: Option<u32>,
    pub dose_count: u32,
    pub last_dose_date: Option<NaiveDate>,
    pub satisfied: bool,
}

/// 爬蟲產出的參考資料
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub illnesses: Vec<Illness>,
    #[serde(default)]
    pub vaccines: Vec<Vaccine>,
    #[serde(default)]
    pub requirements: Vec<RequirementRule>,
}

impl ReferenceData {
    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn illness(&self, id: IllnessId) -> Option<&Illness> {
        self.illnesses.iter().find(|i| i.id == id)
    }

    pub fn requirements_for(&self, country_id: CountryId) -> Vec<&RequirementRule> {
        self.requirements
            .iter()
            .filter(|r| r.country_id == country_id)
            .collect()
    }
}

/// 擷取階段的輸出：參考資料加上單一使用者的接種紀錄
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    pub reference: ReferenceData,
    pub vaccinations: Vec<Vaccination>,
}

/// 轉換階段的輸出
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub status: CountryStatus,
    pub checks: Vec<RequirementCheck>,
    pub csv_output: String,
    pub tsv_output: String,
}
