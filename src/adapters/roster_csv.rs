use crate::domain::model::{LoadedRoster, StaffRecord, StaffRoster, SyncPlan};
use crate::utils::error::{Result, SyncError};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

pub const EMAIL: &str = "Email";
pub const LAST_NAME: &str = "Last Name";
pub const FIRST_NAME: &str = "First Name";
pub const JOB_TITLE: &str = "Job Title";
pub const LOCATION: &str = "Location";
pub const STATUS: &str = "Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Authoritative,
    Target,
}

impl RosterKind {
    pub fn label(&self) -> &'static str {
        match self {
            RosterKind::Authoritative => "authoritative",
            RosterKind::Target => "target",
        }
    }

    // Only the target roster is filtered on status.
    fn requires_status(&self) -> bool {
        matches!(self, RosterKind::Target)
    }
}

struct ColumnMap {
    key: usize,
    email: usize,
    last_name: usize,
    first_name: usize,
    job_title: usize,
    location: usize,
    status: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord, kind: RosterKind, key_column: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SyncError::MissingColumnError {
                roster: kind.label().to_string(),
                column: name.to_string(),
            })
        };

        let status = if kind.requires_status() {
            Some(require(STATUS)?)
        } else {
            find(STATUS)
        };

        Ok(Self {
            key: require(key_column)?,
            email: require(EMAIL)?,
            last_name: require(LAST_NAME)?,
            first_name: require(FIRST_NAME)?,
            job_title: require(JOB_TITLE)?,
            location: require(LOCATION)?,
            status,
        })
    }

    fn record(&self, row: &StringRecord) -> StaffRecord {
        let cell = |index: usize| row.get(index).unwrap_or_default().to_string();

        StaffRecord {
            employee_id: cell(self.key),
            email: cell(self.email),
            last_name: cell(self.last_name),
            first_name: cell(self.first_name),
            job_title: cell(self.job_title),
            location: cell(self.location),
            status: self.status.map(cell).unwrap_or_default(),
        }
    }
}

/// Parse a roster export. Values are taken verbatim; columns other than the
/// key and the six staff fields are ignored. Short rows are padded with empty
/// fields, rows longer than the header are rejected.
pub fn parse_roster(data: &[u8], kind: RosterKind, key_column: &str) -> Result<LoadedRoster> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SyncError::EmptyInputError {
            roster: kind.label().to_string(),
        });
    }
    let columns = ColumnMap::resolve(&headers, kind, key_column)?;

    let mut loaded = LoadedRoster {
        roster: StaffRoster::new(),
        has_status: columns.status.is_some(),
        rows_read: 0,
        duplicate_ids: 0,
    };

    for row in reader.records() {
        let row = row?;
        loaded.rows_read += 1;

        if row.len() > headers.len() {
            return Err(SyncError::MalformedRowError {
                roster: kind.label().to_string(),
                line: row.position().map(|pos| pos.line()).unwrap_or_default(),
                expected: headers.len(),
                found: row.len(),
            });
        }

        let record = columns.record(&row);
        if record.employee_id.is_empty() {
            tracing::warn!(
                "Skipping {} row {} with no '{}'",
                kind.label(),
                loaded.rows_read,
                key_column
            );
            continue;
        }

        if let Some(previous) = loaded.roster.insert(record) {
            loaded.duplicate_ids += 1;
            tracing::warn!(
                "Duplicate {} id {}; keeping the later row",
                kind.label(),
                previous.employee_id
            );
        }
    }

    tracing::debug!(
        "Parsed {} roster: {} rows, {} unique ids",
        kind.label(),
        loaded.rows_read,
        loaded.roster.len()
    );

    Ok(loaded)
}

/// Render the plan as the import CSV. The header is always written.
pub fn render_plan(plan: &SyncPlan, key_column: &str) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([
        key_column, EMAIL, LAST_NAME, FIRST_NAME, JOB_TITLE, LOCATION, STATUS,
    ])?;

    for change in &plan.changes {
        writer.serialize(&change.record)?;
    }

    writer
        .into_inner()
        .map_err(|e| SyncError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ChangeKind, StaffChange};

    const AUTHORITATIVE: &str = "\
Employee ID,Last Name,First Name,Email,Job Title,Location,Hire Date
100,Doe,Alex,a@centercitypcs.org,Teacher,Main Campus,2020-08-01
200,Roe,Sam,,Aide,\"Spring Garden, Annex\",2019-01-15
";

    #[test]
    fn test_parse_authoritative_without_status() {
        let loaded =
            parse_roster(AUTHORITATIVE.as_bytes(), RosterKind::Authoritative, "Employee ID")
                .unwrap();

        assert_eq!(loaded.rows_read, 2);
        assert_eq!(loaded.roster.len(), 2);

        let alex = loaded.roster.get("100").unwrap();
        assert_eq!(alex.email, "a@centercitypcs.org");
        assert_eq!(alex.last_name, "Doe");
        assert_eq!(alex.status, "");

        let sam = loaded.roster.get("200").unwrap();
        assert_eq!(sam.email, "");
        assert_eq!(sam.location, "Spring Garden, Annex");
    }

    #[test]
    fn test_target_requires_status_column() {
        let err = parse_roster(AUTHORITATIVE.as_bytes(), RosterKind::Target, "Employee ID")
            .unwrap_err();

        match err {
            SyncError::MissingColumnError { roster, column } => {
                assert_eq!(roster, "target");
                assert_eq!(column, "Status");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_column() {
        let data = "ID,Email,Last Name,First Name,Job Title,Location\n1,a@x.org,A,B,C,D\n";
        let err =
            parse_roster(data.as_bytes(), RosterKind::Authoritative, "Employee ID").unwrap_err();
        assert!(matches!(
            err,
            SyncError::MissingColumnError { ref column, .. } if column == "Employee ID"
        ));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let err = parse_roster(b"", RosterKind::Target, "Employee ID").unwrap_err();
        assert!(matches!(err, SyncError::EmptyInputError { .. }));
    }

    #[test]
    fn test_short_rows_are_padded_with_empty_fields() {
        let data = "\
Employee ID,Email,Last Name,First Name,Job Title,Location,Status
1,a@x.org,A,B,C,D,Active
2,b@x.org,A,B,C
";
        let loaded = parse_roster(data.as_bytes(), RosterKind::Target, "Employee ID").unwrap();

        assert_eq!(loaded.roster.len(), 2);
        let short = loaded.roster.get("2").unwrap();
        assert_eq!(short.job_title, "C");
        assert_eq!(short.location, "");
        assert_eq!(short.status, "");
    }

    #[test]
    fn test_long_rows_are_malformed() {
        let data = "\
Employee ID,Email,Last Name,First Name,Job Title,Location,Status
1,a@x.org,A,B,C,D,Active
2,b@x.org,A,B,C,D,Active,extra
";
        let err = parse_roster(data.as_bytes(), RosterKind::Target, "Employee ID").unwrap_err();

        match err {
            SyncError::MalformedRowError {
                roster,
                line,
                expected,
                found,
            } => {
                assert_eq!(roster, "target");
                assert_eq!(line, 3);
                assert_eq!(expected, 7);
                assert_eq!(found, 8);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_authoritative_requires_email_column() {
        let data = "Employee ID,Last Name,First Name,Job Title,Location\n1,A,B,C,D\n";
        let err =
            parse_roster(data.as_bytes(), RosterKind::Authoritative, "Employee ID").unwrap_err();

        match err {
            SyncError::MissingColumnError { roster, column } => {
                assert_eq!(roster, "authoritative");
                assert_eq!(column, "Email");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_column_presence_is_recorded() {
        let without =
            parse_roster(AUTHORITATIVE.as_bytes(), RosterKind::Authoritative, "Employee ID")
                .unwrap();
        assert!(!without.has_status);

        let data = "Employee ID,Email,Last Name,First Name,Job Title,Location,Status\n1,a@x.org,A,B,C,D,\n";
        let with = parse_roster(data.as_bytes(), RosterKind::Authoritative, "Employee ID").unwrap();
        assert!(with.has_status);
        assert_eq!(with.roster.get("1").unwrap().status, "");
    }

    #[test]
    fn test_duplicate_ids_and_blank_keys() {
        let data = "\
Employee ID,Email,Last Name,First Name,Job Title,Location,Status
1,old@x.org,A,B,C,D,Active
,nokey@x.org,A,B,C,D,Active
1,new@x.org,A,B,C,D,Active
";
        let loaded = parse_roster(data.as_bytes(), RosterKind::Target, "Employee ID").unwrap();

        assert_eq!(loaded.rows_read, 3);
        assert_eq!(loaded.duplicate_ids, 1);
        assert_eq!(loaded.roster.len(), 1);
        assert_eq!(loaded.roster.get("1").unwrap().email, "new@x.org");
    }

    #[test]
    fn test_render_plan_writes_header_for_empty_plan() {
        let output = render_plan(&SyncPlan::default(), "Employee ID").unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Employee ID,Email,Last Name,First Name,Job Title,Location,Status\n"
        );
    }

    #[test]
    fn test_render_plan_quotes_only_when_needed() {
        let plan = SyncPlan {
            changes: vec![StaffChange {
                kind: ChangeKind::Departed,
                record: StaffRecord {
                    employee_id: "300".to_string(),
                    email: "c@centercitypcs.org".to_string(),
                    last_name: "O'Neil".to_string(),
                    first_name: "Pat".to_string(),
                    job_title: "Teacher, Grade 3".to_string(),
                    location: "Main".to_string(),
                    status: "Inactive".to_string(),
                },
            }],
            ..Default::default()
        };

        let output = String::from_utf8(render_plan(&plan, "Employee ID").unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[1],
            "300,c@centercitypcs.org,O'Neil,Pat,\"Teacher, Grade 3\",Main,Inactive"
        );
    }
}
