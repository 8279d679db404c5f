use anyhow::Result;
use chrono::NaiveDate;
use immuntrack::domain::model::StatusMode;
use immuntrack::{CliConfig, LocalStorage, ReportEngine, StatusPipeline, TrackerError};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const COUNTRIES: &str = "id,iso_code,name
1,DEU,Germany
2,BRA,Brazil
3,THA,Thailand
4,ISL,Iceland
";

const ILLNESSES: &str = "id,name
1,Measles
2,Yellow fever
3,Hepatitis A
4,Polio
";

const VACCINES: &str = "id,name,manufacturer,illness_id
10,Priorix,GSK,1
11,Stamaril,Sanofi,2
12,Havrix,GSK,3
13,Legacy Shot,Unknown,
";

const REQUIREMENTS: &str = "country_id,illness_id,required_doses,validity_period_months
1,1,2,
2,2,1,120
2,1,2,
3,3,1,
3,4,1,
3,1,2,
";

// 使用者 1：麻疹兩劑、黃熱病一劑；3 號疫苗沒有對應疾病，5 號沒有疫苗
const VACCINATIONS: &str = "vaccination_id,user_id,vaccine_id,status,date
1,1,10,completed,2010-05-01
1,1,10,completed,2011-05-01
2,1,11,completed,2020-03-15
3,1,13,completed,2022-01-01
4,2,12,completed,2024-01-01
5,1,,planned,
";

fn write_fixtures(dir: &Path, requirements: &str, vaccinations: &str) -> Result<()> {
    std::fs::write(dir.join("countries.csv"), COUNTRIES)?;
    std::fs::write(dir.join("illnesses.csv"), ILLNESSES)?;
    std::fs::write(dir.join("vaccines.csv"), VACCINES)?;
    std::fs::write(dir.join("requirements.csv"), requirements)?;
    std::fs::write(dir.join("vaccinations.csv"), vaccinations)?;
    Ok(())
}

fn config(data_dir: &str, output_path: &str, mode: StatusMode, today: NaiveDate) -> CliConfig {
    CliConfig {
        data_dir: data_dir.to_string(),
        output_path: output_path.to_string(),
        user_id: 1,
        mode,
        today: Some(today),
        endpoint: None,
        timeout_seconds: None,
        output_formats: vec!["csv".to_string(), "tsv".to_string(), "json".to_string()],
        archive: None,
        verbose: false,
        json_logs: false,
    }
}

fn new_year_2025() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

async fn run(config: CliConfig) -> immuntrack::Result<String> {
    let source = LocalStorage::new(config.data_dir.clone());
    let sink = LocalStorage::new(config.output_path.clone());
    let pipeline = StatusPipeline::new(source, sink, config);
    ReportEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_missing_count_report_end_to_end() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    write_fixtures(data_dir.path(), REQUIREMENTS, VACCINATIONS)?;

    let output_path = out_dir.path().to_str().unwrap().to_string();
    let config = config(
        data_dir.path().to_str().unwrap(),
        &output_path,
        StatusMode::Missing,
        new_year_2025(),
    );

    let result = run(config).await?;
    assert_eq!(result, output_path);

    let csv = std::fs::read_to_string(out_dir.path().join("country_status.csv"))?;
    assert_eq!(
        csv,
        "iso_code,name,mode,value\n\
         BRA,Brazil,missing,0\n\
         DEU,Germany,missing,0\n\
         ISL,Iceland,missing,0\n\
         THA,Thailand,missing,2\n"
    );

    let tsv = std::fs::read_to_string(out_dir.path().join("country_status.tsv"))?;
    assert!(tsv.contains("THA\tThailand\tmissing\t2"));

    let json = std::fs::read_to_string(out_dir.path().join("requirements.json"))?;
    let checks: Vec<serde_json::Value> = serde_json::from_str(&json)?;
    assert_eq!(checks.len(), 6);
    let unmet: Vec<&str> = checks
        .iter()
        .filter(|c| c["satisfied"] == false)
        .map(|c| c["illness_name"].as_str().unwrap())
        .collect();
    assert_eq!(unmet, vec!["Hepatitis A", "Polio"]);

    Ok(())
}

#[tokio::test]
async fn test_percent_report_bundled_in_archive() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    write_fixtures(data_dir.path(), REQUIREMENTS, VACCINATIONS)?;

    let mut config = config(
        data_dir.path().to_str().unwrap(),
        out_dir.path().to_str().unwrap(),
        StatusMode::Percent,
        new_year_2025(),
    );
    config.archive = Some("report.zip".to_string());

    let result = run(config).await?;
    assert!(result.ends_with("report.zip"));
    assert!(!out_dir.path().join("country_status.csv").exists());

    let zip_data = std::fs::read(out_dir.path().join("report.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 3);

    let mut csv = String::new();
    archive.by_name("country_status.csv")?.read_to_string(&mut csv)?;
    assert!(csv.contains("BRA,Brazil,percent,100"));
    assert!(csv.contains("ISL,Iceland,percent,100"));
    assert!(csv.contains("THA,Thailand,percent,33"));

    Ok(())
}

#[tokio::test]
async fn test_validity_window_expires_with_later_evaluation_date() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    write_fixtures(data_dir.path(), REQUIREMENTS, VACCINATIONS)?;

    let mut config = config(
        data_dir.path().to_str().unwrap(),
        out_dir.path().to_str().unwrap(),
        StatusMode::Missing,
        NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(),
    );
    config.output_formats = vec!["csv".to_string()];

    run(config).await?;

    let csv = std::fs::read_to_string(out_dir.path().join("country_status.csv"))?;
    assert!(csv.contains("BRA,Brazil,missing,1"));
    assert!(!out_dir.path().join("requirements.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_negative_required_doses_fails_the_report() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let requirements = format!("{}4,2,-1,\n", REQUIREMENTS);
    write_fixtures(data_dir.path(), &requirements, VACCINATIONS)?;

    let config = config(
        data_dir.path().to_str().unwrap(),
        out_dir.path().to_str().unwrap(),
        StatusMode::Missing,
        new_year_2025(),
    );

    let err = run(config).await.unwrap_err();
    assert!(matches!(
        err,
        TrackerError::InvalidRule {
            country_id: 4,
            illness_id: 2,
            ..
        }
    ));
    assert!(!out_dir.path().join("country_status.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_badly_formatted_dose_date_is_rejected() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let vaccinations = format!("{}6,1,12,completed,15.03.2024\n", VACCINATIONS);
    write_fixtures(data_dir.path(), REQUIREMENTS, &vaccinations)?;

    let config = config(
        data_dir.path().to_str().unwrap(),
        out_dir.path().to_str().unwrap(),
        StatusMode::Missing,
        new_year_2025(),
    );

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, TrackerError::ValidationError { .. }));
    assert!(err.user_friendly_message().contains("YYYY-MM-DD"));

    Ok(())
}

#[tokio::test]
async fn test_missing_reference_file_is_io_error() -> Result<()> {
    let data_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;

    let config = config(
        data_dir.path().to_str().unwrap(),
        out_dir.path().to_str().unwrap(),
        StatusMode::Missing,
        new_year_2025(),
    );

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, TrackerError::IoError(_)));

    Ok(())
}
