use crate::error::AppError;
use crate::models::job::{COLUMNS, JobRecord};

/// One header row, then one row per record. Sentinels are written as-is.
pub fn to_bytes(records: &[JobRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.columns().iter().map(|c| c.as_bytes()))?;
    }
    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobDetails;
    use pretty_assertions::assert_eq;

    fn parse(bytes: &[u8]) -> Vec<Vec<String>> {
        ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_order() {
        let rows = parse(&to_bytes(&[]).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![
                "Job ID",
                "Job Title",
                "Company",
                "Reviews",
                "Location",
                "Experience",
                "Salary",
                "Posted On",
                "Openings",
                "Applications",
                "Job Description",
                "Role",
                "Industry Type",
                "Department",
                "Employment Type",
                "Role Category",
                "Education",
                "Key Skills",
                "Job URL",
            ]
        );
    }

    #[test]
    fn test_rows_in_order_with_sentinels() {
        let mut first = JobDetails::empty("https://www.naukri.com/job-listings-a-1");
        first.title = "Data Engineer".to_string();
        first.description = "Build pipelines\n- own them".to_string();
        let records = vec![
            JobRecord { id: 1, details: first },
            JobRecord {
                id: 2,
                details: JobDetails::empty("NA"),
            },
        ];

        let rows = parse(&to_bytes(&records).unwrap());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "1");
        assert_eq!(rows[1][1], "Data Engineer");
        assert_eq!(rows[1][2], "NA");
        assert_eq!(rows[1][10], "Build pipelines\n- own them");
        assert_eq!(
            rows[1][18],
            "=HYPERLINK(\"https://www.naukri.com/job-listings-a-1\", \"View Job\")"
        );
        assert_eq!(rows[2][0], "2");
        assert!(rows[2][1..].iter().all(|c| c == "NA"));
    }
}
