use crate::domain::model::{
    ChangeKind, MatchRules, RosterPair, StaffChange, StaffRecord, StaffRoster, SyncPlan,
    SyncSummary,
};
use crate::utils::error::{Result, SyncError};
use std::collections::HashMap;

/// Authoritative records in scope: email present and on the organisation's domain.
pub fn eligible_authoritative(roster: &StaffRoster, rules: &MatchRules) -> StaffRoster {
    roster.filtered(|record| {
        !record.email.is_empty() && record.email.ends_with(&rules.email_domain)
    })
}

/// Target records in scope: only those currently marked active.
pub fn active_target(roster: &StaffRoster, rules: &MatchRules) -> StaffRoster {
    roster.filtered(|record| record.status == rules.active_status)
}

/// Authoritative values win. The target's status is kept only when the
/// authoritative export has no Status column.
fn updated_record(
    authoritative: &StaffRecord,
    target: &StaffRecord,
    authoritative_has_status: bool,
) -> StaffRecord {
    let mut record = authoritative.clone();
    if !authoritative_has_status {
        record.status = target.status.clone();
    }
    record
}

pub fn updated_staff(
    authoritative: &StaffRoster,
    target: &StaffRoster,
    authoritative_has_status: bool,
) -> Vec<StaffRecord> {
    authoritative
        .iter()
        .filter_map(|ours| {
            let theirs = target.get(&ours.employee_id)?;
            let changed = ours.changed_fields(theirs);
            if changed.is_empty() {
                return None;
            }
            tracing::debug!(
                "Employee {} changed: {}",
                ours.employee_id,
                changed.join(", ")
            );
            Some(updated_record(ours, theirs, authoritative_has_status))
        })
        .collect()
}

pub fn new_staff(authoritative: &StaffRoster, target: &StaffRoster) -> Vec<StaffRecord> {
    authoritative
        .iter()
        .filter(|record| !target.contains(&record.employee_id))
        .cloned()
        .collect()
}

pub fn departed_staff(
    authoritative: &StaffRoster,
    target: &StaffRoster,
    rules: &MatchRules,
) -> Vec<StaffRecord> {
    target
        .iter()
        .filter(|record| !authoritative.contains(&record.employee_id))
        .map(|record| StaffRecord {
            status: rules.inactive_status.clone(),
            ..record.clone()
        })
        .collect()
}

/// Fails if any employee id landed in more than one group.
fn ensure_exclusive(changes: &[StaffChange]) -> Result<()> {
    let mut seen: HashMap<&str, ChangeKind> = HashMap::new();

    for change in changes {
        let id = change.record.employee_id.as_str();
        if let Some(previous) = seen.insert(id, change.kind) {
            if previous != change.kind {
                return Err(SyncError::InvariantViolation {
                    employee_id: id.to_string(),
                    groups: format!("{}, {}", previous, change.kind),
                });
            }
        }
    }

    Ok(())
}

/// Compare both rosters and produce the update plan.
///
/// Each roster is filtered first. Updated rows come from the inner join,
/// New rows from authoritative ids with no active target record, and
/// Departed rows from active target ids with no eligible authoritative
/// record (reported with the inactive status).
pub fn reconcile(rosters: &RosterPair, rules: &MatchRules) -> Result<SyncPlan> {
    let authoritative = eligible_authoritative(&rosters.authoritative.roster, rules);
    let target = active_target(&rosters.target.roster, rules);

    tracing::info!(
        "Authoritative roster: {} of {} records eligible (domain {})",
        authoritative.len(),
        rosters.authoritative.roster.len(),
        rules.email_domain
    );
    tracing::info!(
        "Target roster: {} of {} records {}",
        target.len(),
        rosters.target.roster.len(),
        rules.active_status
    );

    let groups = [
        (
            ChangeKind::Updated,
            updated_staff(&authoritative, &target, rosters.authoritative.has_status),
        ),
        (ChangeKind::New, new_staff(&authoritative, &target)),
        (ChangeKind::Departed, departed_staff(&authoritative, &target, rules)),
    ];

    let mut summary = SyncSummary {
        authoritative_rows: rosters.authoritative.rows_read,
        authoritative_eligible: authoritative.len(),
        authoritative_duplicates: rosters.authoritative.duplicate_ids,
        target_rows: rosters.target.rows_read,
        target_active: target.len(),
        target_duplicates: rosters.target.duplicate_ids,
        ..Default::default()
    };

    let mut changes = Vec::new();
    for (kind, records) in groups {
        match kind {
            ChangeKind::Updated => summary.updated = records.len(),
            ChangeKind::New => summary.new = records.len(),
            ChangeKind::Departed => summary.departed = records.len(),
        }
        changes.extend(records.into_iter().map(|record| StaffChange { kind, record }));
    }

    ensure_exclusive(&changes)?;

    tracing::info!(
        "Reconciled: {} updated, {} new, {} departed",
        summary.updated,
        summary.new,
        summary.departed
    );

    Ok(SyncPlan { changes, summary })
}
