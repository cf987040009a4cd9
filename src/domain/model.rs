use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// One staff member as exported by either system. Every value is kept as the
/// raw string from the CSV; an absent cell is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaffRecord {
    #[serde(rename = "Employee ID")]
    pub employee_id: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl StaffRecord {
    /// Names of the compared fields whose values differ. Status is not compared.
    pub fn changed_fields(&self, other: &StaffRecord) -> Vec<&'static str> {
        let pairs = [
            ("Email", &self.email, &other.email),
            ("Last Name", &self.last_name, &other.last_name),
            ("First Name", &self.first_name, &other.first_name),
            ("Job Title", &self.job_title, &other.job_title),
            ("Location", &self.location, &other.location),
        ];

        pairs
            .into_iter()
            .filter(|(_, ours, theirs)| ours != theirs)
            .map(|(name, _, _)| name)
            .collect()
    }
}

/// Records keyed by employee id, iterated in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct StaffRoster {
    records: Vec<StaffRecord>,
    index: HashMap<String, usize>,
}

impl StaffRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A repeated id overwrites the earlier values in place
    /// and the replaced record is returned.
    pub fn insert(&mut self, record: StaffRecord) -> Option<StaffRecord> {
        match self.index.get(&record.employee_id) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index
                    .insert(record.employee_id.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, employee_id: &str) -> Option<&StaffRecord> {
        self.index.get(employee_id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, employee_id: &str) -> bool {
        self.index.contains_key(employee_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaffRecord> {
        self.records.iter()
    }

    /// New roster holding only the records matching `keep`, order preserved.
    pub fn filtered<F>(&self, mut keep: F) -> StaffRoster
    where
        F: FnMut(&StaffRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| keep(record))
            .cloned()
            .collect()
    }
}

impl FromIterator<StaffRecord> for StaffRoster {
    fn from_iter<I: IntoIterator<Item = StaffRecord>>(iter: I) -> Self {
        let mut roster = StaffRoster::new();
        for record in iter {
            roster.insert(record);
        }
        roster
    }
}

pub const DEFAULT_EMAIL_DOMAIN: &str = "@centercitypcs.org";
pub const DEFAULT_ACTIVE_STATUS: &str = "Active";
pub const DEFAULT_INACTIVE_STATUS: &str = "Inactive";

/// Eligibility rules applied to both rosters before they are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    pub email_domain: String,
    pub active_status: String,
    pub inactive_status: String,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            active_status: DEFAULT_ACTIVE_STATUS.to_string(),
            inactive_status: DEFAULT_INACTIVE_STATUS.to_string(),
        }
    }
}

/// Where the update file goes. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::Stdout => f.write_str("<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A roster as read from disk, with loading statistics.
#[derive(Debug, Clone, Default)]
pub struct LoadedRoster {
    pub roster: StaffRoster,
    /// Whether the export carried a Status column at all.
    pub has_status: bool,
    pub rows_read: usize,
    pub duplicate_ids: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RosterPair {
    pub authoritative: LoadedRoster,
    pub target: LoadedRoster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Updated,
    New,
    Departed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Updated => "updated",
            ChangeKind::New => "new",
            ChangeKind::Departed => "departed",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffChange {
    pub kind: ChangeKind,
    pub record: StaffRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub authoritative_rows: usize,
    pub authoritative_eligible: usize,
    pub authoritative_duplicates: usize,
    pub target_rows: usize,
    pub target_active: usize,
    pub target_duplicates: usize,
    pub updated: usize,
    pub new: usize,
    pub departed: usize,
}

impl SyncSummary {
    pub fn total_changes(&self) -> usize {
        self.updated + self.new + self.departed
    }
}

/// Output of a reconciliation: Updated rows, then New, then Departed.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub changes: Vec<StaffChange>,
    pub summary: SyncSummary,
}

impl SyncPlan {
    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &StaffRecord> {
        self.changes
            .iter()
            .filter(move |change| change.kind == kind)
            .map(|change| &change.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, email: &str) -> StaffRecord {
        StaffRecord {
            employee_id: id.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_roster_last_seen_wins_in_first_position() {
        let mut roster = StaffRoster::new();
        assert!(roster.insert(record("1", "first@x.org")).is_none());
        assert!(roster.insert(record("2", "two@x.org")).is_none());
        let replaced = roster.insert(record("1", "second@x.org"));

        assert_eq!(replaced.unwrap().email, "first@x.org");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("1").unwrap().email, "second@x.org");

        let ids: Vec<&str> = roster.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_filtered_keeps_order() {
        let roster: StaffRoster = vec![
            record("3", "c@x.org"),
            record("1", ""),
            record("2", "b@x.org"),
        ]
        .into_iter()
        .collect();

        let kept = roster.filtered(|r| !r.email.is_empty());
        let ids: Vec<&str> = kept.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
        assert!(!kept.contains("1"));
    }

    #[test]
    fn test_changed_fields_ignores_status() {
        let mut ours = record("1", "a@x.org");
        ours.status = "Active".to_string();
        let mut theirs = ours.clone();
        theirs.status = "Inactive".to_string();
        assert!(ours.changed_fields(&theirs).is_empty());

        theirs.job_title = "Teacher".to_string();
        theirs.location = "Main".to_string();
        assert_eq!(ours.changed_fields(&theirs), vec!["Job Title", "Location"]);
    }

    #[test]
    fn test_output_target_dash_is_stdout() {
        assert_eq!(OutputTarget::parse("-"), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::parse("updates.csv"),
            OutputTarget::File(PathBuf::from("updates.csv"))
        );
        assert_eq!(OutputTarget::Stdout.to_string(), "<stdout>");
    }
}
