use chrono::NaiveDate;

use super::domain::{Application, ApplicationId, ColumnId, Priority};
use super::store::{BoardError, BoardStore};

struct SampleCandidate {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    priority: Priority,
    due: (i32, u32, u32),
    status: &'static str,
    column: ColumnId,
}

const SAMPLE_CANDIDATES: [SampleCandidate; 10] = [
    SampleCandidate {
        id: "1",
        title: "John Smith - Senior Developer",
        description: "Strong experience in React and Node.js. Previous role at Tech Corp.",
        priority: Priority::High,
        due: (2024, 10, 20),
        status: "Review CV",
        column: ColumnId::LongList,
    },
    SampleCandidate {
        id: "2",
        title: "Sarah Johnson - Product Manager",
        description: "10 years experience in SaaS products. MBA from Stanford.",
        priority: Priority::High,
        due: (2024, 10, 18),
        status: "Initial screening",
        column: ColumnId::ShortList,
    },
    SampleCandidate {
        id: "3",
        title: "Michael Chen - Data Scientist",
        description: "PhD in Machine Learning. Published researcher with Python expertise.",
        priority: Priority::Medium,
        due: (2024, 10, 22),
        status: "Technical interview scheduled",
        column: ColumnId::Interview,
    },
    SampleCandidate {
        id: "4",
        title: "Emily Brown - UX Designer",
        description: "Award-winning portfolio. Specializes in enterprise applications.",
        priority: Priority::High,
        due: (2024, 10, 19),
        status: "Offer pending approval",
        column: ColumnId::Offer,
    },
    SampleCandidate {
        id: "5",
        title: "David Wilson - Marketing Manager",
        description: "Led successful campaigns for Fortune 500 companies.",
        priority: Priority::Medium,
        due: (2024, 10, 25),
        status: "Background check",
        column: ColumnId::Compliance,
    },
    SampleCandidate {
        id: "6",
        title: "Lisa Anderson - Frontend Developer",
        description: "React specialist with accessibility expertise. Previous at Google.",
        priority: Priority::Low,
        due: (2024, 10, 28),
        status: "Equipment setup",
        column: ColumnId::Onboarding,
    },
    SampleCandidate {
        id: "7",
        title: "James Taylor - DevOps Engineer",
        description: "AWS certified. Kubernetes expert with CI/CD experience.",
        priority: Priority::Medium,
        due: (2024, 10, 15),
        status: "Started on 10/01",
        column: ColumnId::Hired,
    },
    SampleCandidate {
        id: "8",
        title: "Maria Garcia - Sales Director",
        description: "Exceeded targets by 150% in previous role. B2B SaaS expert.",
        priority: Priority::High,
        due: (2024, 10, 21),
        status: "Phone screening",
        column: ColumnId::LongList,
    },
    SampleCandidate {
        id: "9",
        title: "Robert Lee - Backend Developer",
        description: "Java and Spring Boot expert. Microservices architecture.",
        priority: Priority::Medium,
        due: (2024, 10, 23),
        status: "Code test sent",
        column: ColumnId::ShortList,
    },
    SampleCandidate {
        id: "10",
        title: "Jennifer White - HR Manager",
        description: "SHRM certified. Experience in tech industry recruitment.",
        priority: Priority::Low,
        due: (2024, 10, 26),
        status: "Culture fit interview",
        column: ColumnId::Interview,
    },
];

/// The ten demo candidates spread across every stage.
pub fn sample_applications() -> Vec<Application> {
    SAMPLE_CANDIDATES
        .iter()
        .filter_map(|candidate| {
            let (year, month, day) = candidate.due;
            let due_date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(Application {
                id: ApplicationId::from(candidate.id),
                title: candidate.title.to_string(),
                description: candidate.description.to_string(),
                priority: candidate.priority,
                due_date,
                status: candidate.status.to_string(),
                column_id: candidate.column,
            })
        })
        .collect()
}

impl BoardStore {
    /// Board pre-populated with the demo pipeline.
    pub fn sample() -> Result<Self, BoardError> {
        Self::from_applications(sample_applications())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_board_places_every_candidate() {
        let store = BoardStore::sample().expect("sample ids are unique");
        assert_eq!(store.application_count(), 10);
        store.verify().expect("sample board is consistent");

        let long_list: Vec<_> = store
            .column(ColumnId::LongList)
            .applications
            .iter()
            .map(|application| application.id.as_str())
            .collect();
        assert_eq!(long_list, vec!["1", "8"]);
        assert_eq!(store.column(ColumnId::Hired).len(), 1);
    }
}
