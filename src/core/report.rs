use crate::domain::model::{Country, CountryStatus, RequirementCheck};
use crate::utils::error::{Result, TrackerError};

pub const STATUS_HEADER: [&str; 4] = ["iso_code", "name", "mode", "value"];

/// 把國家狀態輸出成以 `delimiter` 分隔的表格（CSV 用 `,`，TSV 用 `\t`）
pub fn render_status_table(
    status: &CountryStatus,
    countries: &[Country],
    delimiter: u8,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(STATUS_HEADER)?;
    for (iso_code, value) in &status.values {
        let name = countries
            .iter()
            .find(|c| &c.iso_code == iso_code)
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let value = value.to_string();
        writer.write_record([iso_code.as_str(), name, status.mode.as_str(), value.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TrackerError::IoError(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| TrackerError::ProcessingError {
        message: format!("status table is not valid UTF-8: {}", e),
    })
}

pub fn render_checks_json(checks: &[RequirementCheck]) -> Result<String> {
    Ok(serde_json::to_string_pretty(checks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StatusMode;
    use std::collections::BTreeMap;

    fn status() -> CountryStatus {
        let mut values = BTreeMap::new();
        values.insert("DEU".to_string(), 0);
        values.insert("KOR".to_string(), 2);
        CountryStatus {
            mode: StatusMode::Missing,
            values,
        }
    }

    fn countries() -> Vec<Country> {
        vec![
            Country {
                id: 1,
                iso_code: "DEU".to_string(),
                name: "Germany".to_string(),
            },
            Country {
                id: 2,
                iso_code: "KOR".to_string(),
                name: "Korea, Republic of".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_csv_quotes_names_with_commas() {
        let csv = render_status_table(&status(), &countries(), b',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "iso_code,name,mode,value");
        assert_eq!(lines[1], "DEU,Germany,missing,0");
        assert_eq!(lines[2], "KOR,\"Korea, Republic of\",missing,2");
    }

    #[test]
    fn test_render_tsv() {
        let tsv = render_status_table(&status(), &countries(), b'\t').unwrap();
        assert!(tsv.starts_with("iso_code\tname\tmode\tvalue\n"));
        assert!(tsv.contains("KOR\tKorea, Republic of\tmissing\t2"));
    }
}
