//! Knowledge-capture workshop checklist: tasks grouped by planning phase, a
//! departmental contact list and progress roll-ups.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::risk::share_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TaskStatus {
    #[default]
    NotStarted,
    Started,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::Started,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::Started => "Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::invalid_field("status", value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: u32,
    pub task: String,
    pub responsible: String,
    pub owner: String,
    /// ISO date or empty.
    pub deadline: String,
    pub status: TaskStatus,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub department: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskEdit {
    Owner(String),
    Deadline(String),
    Status(TaskStatus),
    Notes(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactEdit {
    ContactPerson(String),
    Email(String),
    Phone(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub not_started: usize,
    pub started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl Progress {
    fn add(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::NotStarted => self.not_started += 1,
            TaskStatus::Started => self.started += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Completed => self.completed += 1,
        }
    }

    /// `None` for an empty section.
    pub fn completion_percent(&self) -> Option<f64> {
        share_percent(self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionProgress {
    pub title: String,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistProgress {
    pub overall: Progress,
    pub sections: Vec<SectionProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checklist {
    pub sections: Vec<Section>,
    pub contacts: Vec<Contact>,
}

impl Default for Checklist {
    fn default() -> Self {
        let sections = DEFAULT_PLAN
            .iter()
            .map(|(title, tasks)| Section {
                title: title.to_string(),
                tasks: tasks
                    .iter()
                    .map(|(id, task, responsible, notes)| Task {
                        id: *id,
                        task: task.to_string(),
                        responsible: responsible.to_string(),
                        owner: String::new(),
                        deadline: String::new(),
                        status: TaskStatus::NotStarted,
                        notes: notes.to_string(),
                    })
                    .collect(),
            })
            .collect();

        let contacts = DEFAULT_CONTACTS
            .iter()
            .map(|(department, notes)| Contact {
                department: department.to_string(),
                contact_person: String::new(),
                email: String::new(),
                phone: String::new(),
                notes: notes.to_string(),
            })
            .collect();

        Self { sections, contacts }
    }
}

impl Checklist {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(|section| section.tasks.iter())
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks().find(|task| task.id == id)
    }

    /// Deadlines must be empty or `YYYY-MM-DD`.
    pub fn update_task(&mut self, id: u32, edit: TaskEdit) -> Result<()> {
        let task = self
            .sections
            .iter_mut()
            .flat_map(|section| section.tasks.iter_mut())
            .find(|task| task.id == id)
            .ok_or(Error::UnknownTask(id))?;

        match edit {
            TaskEdit::Owner(owner) => task.owner = owner,
            TaskEdit::Deadline(deadline) => {
                let trimmed = deadline.trim();
                if !trimmed.is_empty() && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
                    return Err(Error::invalid_field("deadline", deadline));
                }
                task.deadline = trimmed.to_string();
            }
            TaskEdit::Status(status) => task.status = status,
            TaskEdit::Notes(notes) => task.notes = notes,
        }
        debug!(task = id, "workshop task updated");
        Ok(())
    }

    pub fn update_contact(&mut self, index: usize, edit: ContactEdit) -> Result<()> {
        let contact = self
            .contacts
            .get_mut(index)
            .ok_or_else(|| Error::invalid_field("contact", index.to_string()))?;
        match edit {
            ContactEdit::ContactPerson(person) => contact.contact_person = person,
            ContactEdit::Email(email) => contact.email = email,
            ContactEdit::Phone(phone) => contact.phone = phone,
        }
        Ok(())
    }

    pub fn progress(&self) -> ChecklistProgress {
        let mut overall = Progress::default();
        let sections = self
            .sections
            .iter()
            .map(|section| {
                let mut progress = Progress::default();
                for task in &section.tasks {
                    progress.add(task.status);
                    overall.add(task.status);
                }
                SectionProgress {
                    title: section.title.clone(),
                    progress,
                }
            })
            .collect();

        ChecklistProgress { overall, sections }
    }

    /// Unfinished tasks whose deadline is before `as_of`.
    pub fn overdue(&self, as_of: NaiveDate) -> Vec<&Task> {
        self.tasks()
            .filter(|task| task.status != TaskStatus::Completed)
            .filter(|task| {
                NaiveDate::parse_from_str(&task.deadline, "%Y-%m-%d")
                    .map(|deadline| deadline < as_of)
                    .unwrap_or(false)
            })
            .collect()
    }
}

type PlanTask = (u32, &'static str, &'static str, &'static str);

const DEFAULT_PLAN: &[(&str, &[PlanTask])] = &[
    (
        "Pre-Workshop Planning (3–4 Weeks Before)",
        &[
            (1, "Confirm workshop date and duration", "Organizing Team", ""),
            (2, "Develop workshop agenda and objectives", "Organizing Team", ""),
            (3, "Identify and confirm list of KM Focal Persons", "HCM", ""),
            (4, "Secure budget approval", "Finance/Admin", ""),
            (5, "Brief HCM Leadership Team on workshop plan", "Organizing Team", ""),
        ],
    ),
    (
        "Logistics & Venue (2–3 Weeks Before)",
        &[
            (6, "Submit venue request to Corporate Admin Services", "Corporate Admin Services", ""),
            (7, "Confirm venue booking and setup requirements", "Corporate Admin Services", ""),
            (8, "Arrange seating layout (U-shape/classroom/roundtable)", "Corporate Admin Services", ""),
            (9, "Confirm accessibility and parking arrangements", "Corporate Admin Services", ""),
        ],
    ),
    (
        "Catering & Welfare (2 Weeks Before)",
        &[
            (10, "Submit catering request to Welfare Department", "Welfare", "Include dietary requirements"),
            (11, "Confirm menu and meal times", "Welfare", "Tea breaks, lunch"),
            (12, "Arrange refreshments (water, tea/coffee)", "Welfare", "Throughout the day"),
            (13, "Confirm final headcount for catering", "Welfare", "3 days before event"),
        ],
    ),
    (
        "Technology & AV Support (2 Weeks Before)",
        &[
            (14, "Submit AV requirements to ITD", "ITD", "Projector, screens, mics, laptop"),
            (15, "Test all AV equipment", "ITD", "Day before workshop"),
            (16, "Ensure stable internet connectivity", "ITD", "For virtual components"),
            (17, "Arrange tech support during workshop", "ITD", "On-call technician"),
            (18, "Prepare backup equipment", "ITD", "Spare laptop, adapters"),
        ],
    ),
    (
        "Materials & Documentation (1–2 Weeks Before)",
        &[
            (19, "Prepare workshop materials and presentations", "Organizing Team", ""),
            (20, "Print participant folders/binders", "Admin Support", ""),
            (21, "Prepare name tags/tent cards", "Admin Support", ""),
            (22, "Print attendance sheets", "Admin Support", ""),
            (23, "Prepare feedback/evaluation forms", "Organizing Team", ""),
            (24, "Prepare certificates of participation (if applicable)", "Admin Support", ""),
            (25, "Arrange stationery (pens, notepads, flip charts)", "Admin Support", ""),
        ],
    ),
    (
        "Communication & Invitations (2–3 Weeks Before)",
        &[
            (26, "Send formal invitations to KM Focal Persons", "Organizing Team", ""),
            (27, "Send pre-reading materials (if any)", "Organizing Team", ""),
            (28, "Send travel/accommodation guidance", "Admin Support", "For out-of-station participants"),
            (29, "Send reminder email (1 week before)", "Organizing Team", ""),
            (30, "Send final reminder (1 day before)", "Organizing Team", "Include agenda, venue details"),
            (31, "Notify security of expected visitors", "Admin Support", ""),
        ],
    ),
    (
        "Final Preparations (1 Week Before)",
        &[
            (32, "Conduct final walkthrough of venue", "Organizing Team", ""),
            (33, "Confirm all vendor arrangements", "Admin Support", ""),
            (34, "Prepare facilitator's guide/script", "Organizing Team", ""),
            (35, "Brief facilitators/presenters", "Organizing Team", ""),
            (36, "Prepare emergency contact list", "Admin Support", ""),
        ],
    ),
    (
        "During Workshop (Workshop Day)",
        &[
            (37, "Set up registration desk", "Admin Support", "30 mins before start"),
            (38, "Conduct AV equipment check", "ITD", "30 mins before start"),
            (39, "Distribute materials to participants", "Admin Support", ""),
            (40, "Take attendance", "Admin Support", ""),
            (41, "Take photos/documentation", "Communications/PR", ""),
            (42, "Monitor session timing", "Organizing Team", ""),
            (43, "Distribute and collect feedback forms", "Admin Support", "End of workshop"),
        ],
    ),
    (
        "Post-Workshop Activities (1–2 Weeks After)",
        &[
            (44, "Compile and analyze feedback forms", "Organizing Team", ""),
            (45, "Prepare workshop report", "Organizing Team", "Include outcomes, action items"),
            (46, "Share workshop photos and highlights", "Communications", ""),
            (47, "Distribute workshop materials/presentations", "Organizing Team", ""),
            (48, "Send thank you notes to participants", "Organizing Team", ""),
            (49, "Present feedback and outcomes to HCM Leadership Team", "Organizing Team", ""),
            (50, "Document lessons learned", "Organizing Team", ""),
            (51, "Follow up on action items identified", "Organizing Team", ""),
            (52, "Archive all workshop documentation", "Admin Support", ""),
        ],
    ),
];

const DEFAULT_CONTACTS: &[(&str, &str)] = &[
    ("Corporate Admin Services", "Venue"),
    ("Welfare Department", "Catering"),
    ("ITD", "AV Support"),
    ("HCM Leadership Team", "Reporting"),
    ("Security", "Access control"),
    ("Communications/PR", "Documentation"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_has_fifty_two_tasks() {
        let checklist = Checklist::default();
        assert_eq!(checklist.sections.len(), 9);
        assert_eq!(checklist.tasks().count(), 52);
        assert_eq!(checklist.contacts.len(), 6);

        let ids: Vec<u32> = checklist.tasks().map(|t| t.id).collect();
        assert_eq!(ids, (1..=52).collect::<Vec<u32>>());
    }

    #[test]
    fn progress_rolls_up_by_section() {
        let mut checklist = Checklist::default();
        checklist.update_task(1, TaskEdit::Status(TaskStatus::Completed)).unwrap();
        checklist.update_task(2, TaskEdit::Status(TaskStatus::InProgress)).unwrap();
        checklist.update_task(6, TaskEdit::Status(TaskStatus::Completed)).unwrap();

        let progress = checklist.progress();
        assert_eq!(progress.overall.total, 52);
        assert_eq!(progress.overall.completed, 2);
        assert_eq!(progress.overall.in_progress, 1);

        let planning = &progress.sections[0].progress;
        assert_eq!(planning.completed, 1);
        assert_eq!(planning.completion_percent(), Some(20.0));
        assert_eq!(progress.sections[1].progress.completion_percent(), Some(25.0));
    }

    #[test]
    fn empty_section_has_no_completion_percent() {
        assert_eq!(Progress::default().completion_percent(), None);
    }

    #[test]
    fn deadlines_must_be_iso_dates() {
        let mut checklist = Checklist::default();
        checklist.update_task(3, TaskEdit::Deadline("2026-05-01".to_string())).unwrap();
        assert_eq!(checklist.task(3).unwrap().deadline, "2026-05-01");

        let err = checklist
            .update_task(3, TaskEdit::Deadline("next week".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "deadline", .. }));

        checklist.update_task(3, TaskEdit::Deadline(String::new())).unwrap();
        assert!(checklist.task(3).unwrap().deadline.is_empty());
    }

    #[test]
    fn unknown_task_is_an_error() {
        let mut checklist = Checklist::default();
        let err = checklist
            .update_task(99, TaskEdit::Owner("Ada".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTask(99)));
    }

    #[test]
    fn overdue_skips_completed_tasks() {
        let mut checklist = Checklist::default();
        checklist.update_task(4, TaskEdit::Deadline("2026-02-01".to_string())).unwrap();
        checklist.update_task(5, TaskEdit::Deadline("2026-02-01".to_string())).unwrap();
        checklist.update_task(5, TaskEdit::Status(TaskStatus::Completed)).unwrap();
        checklist.update_task(7, TaskEdit::Deadline("2026-04-01".to_string())).unwrap();

        let as_of = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let overdue: Vec<u32> = checklist.overdue(as_of).iter().map(|t| t.id).collect();
        assert_eq!(overdue, vec![4]);
    }

    #[test]
    fn contacts_are_editable_by_position() {
        let mut checklist = Checklist::default();
        checklist
            .update_contact(2, ContactEdit::Email("itd@example.com".to_string()))
            .unwrap();
        assert_eq!(checklist.contacts[2].email, "itd@example.com");
        assert!(checklist
            .update_contact(10, ContactEdit::Phone("0".to_string()))
            .is_err());
    }

    #[test]
    fn status_parses_display_text() {
        assert_eq!("in progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("done".parse::<TaskStatus>().is_err());
    }
}
