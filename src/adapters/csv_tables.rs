//! 爬蟲產出的 CSV 參考資料表，以及使用者的接種紀錄匯出檔

use crate::core::records::{group_vaccination_rows, VaccinationRow};
use crate::domain::model::{Country, Illness, ReferenceData, RequirementRule, UserId, Vaccination, Vaccine};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

pub const COUNTRIES_FILE: &str = "countries.csv";
pub const ILLNESSES_FILE: &str = "illnesses.csv";
pub const VACCINES_FILE: &str = "vaccines.csv";
pub const REQUIREMENTS_FILE: &str = "requirements.csv";
pub const VACCINATIONS_FILE: &str = "vaccinations.csv";

/// 解析帶標題列的 CSV；空白欄位對應到 `None`
pub fn parse_table<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

async fn read_table<T: DeserializeOwned, S: Storage>(storage: &S, file: &str) -> Result<Vec<T>> {
    let data = storage.read_file(file).await?;
    let rows: Vec<T> = parse_table(&data)?;
    tracing::debug!("📄 {}: {} rows", file, rows.len());
    Ok(rows)
}

pub async fn read_reference<S: Storage>(storage: &S) -> Result<ReferenceData> {
    let countries: Vec<Country> = read_table(storage, COUNTRIES_FILE).await?;
    let illnesses: Vec<Illness> = read_table(storage, ILLNESSES_FILE).await?;
    let vaccines: Vec<Vaccine> = read_table(storage, VACCINES_FILE).await?;
    let requirements: Vec<RequirementRule> = read_table(storage, REQUIREMENTS_FILE).await?;

    Ok(ReferenceData {
        countries,
        illnesses,
        vaccines,
        requirements,
    })
}

pub async fn read_vaccinations<S: Storage>(storage: &S, user_id: UserId) -> Result<Vec<Vaccination>> {
    let rows: Vec<VaccinationRow> = read_table(storage, VACCINATIONS_FILE).await?;
    group_vaccination_rows(rows, user_id)
}
