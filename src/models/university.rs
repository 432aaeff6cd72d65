use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::utils::json::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Major {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Faculty {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub majors: Vec<Major>,
}

impl Faculty {
    pub fn find_major(&self, major_id: &str) -> Option<&Major> {
        self.majors.iter().find(|m| m.id == major_id)
    }
}

/// Canonical university: faculties and majors in server order. Counts are
/// always derived from the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub faculties: Vec<Faculty>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Default for University {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: String::new(),
            is_active: false,
            faculties: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl University {
    pub fn faculty_count(&self) -> usize {
        self.faculties.len()
    }

    pub fn major_count(&self) -> usize {
        self.faculties.iter().map(|f| f.majors.len()).sum()
    }

    pub fn find_faculty(&self, faculty_id: &str) -> Option<&Faculty> {
        self.faculties.iter().find(|f| f.id == faculty_id)
    }

    /// Resolves a (faculty, major) pair, checking the major belongs to it.
    pub fn find_major(&self, faculty_id: &str, major_id: &str) -> Option<(&Faculty, &Major)> {
        let faculty = self.find_faculty(faculty_id)?;
        faculty.find_major(major_id).map(|major| (faculty, major))
    }

    pub fn to_list_item(&self) -> UniversityListItem {
        UniversityListItem {
            id: self.id.clone(),
            name: self.name.clone(),
            is_active: self.is_active,
            faculty_count: self.faculty_count() as u32,
            major_count: self.major_count() as u32,
        }
    }
}

/// List projection with cached counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UniversityListItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub faculty_count: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub major_count: u32,
}

/// Case-insensitive substring match on the university name.
pub fn search_universities<'a>(
    items: &'a [UniversityListItem],
    query: &str,
) -> Vec<&'a UniversityListItem> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorCreate {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub majors: Vec<MajorCreate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversityCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faculties: Vec<FacultyCreate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UniversityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl_from_json!(Major, Faculty, University, UniversityListItem);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::json::FromJson;
    use serde_json::json;

    fn sample() -> University {
        University::from_json(&json!({
            "id": "univ-1",
            "name": "Universitas Indonesia",
            "is_active": true,
            "faculties": [
                {
                    "id": "fak-1",
                    "name": "Fakultas Ilmu Komputer",
                    "majors": [
                        {"id": "maj-1", "name": "Ilmu Komputer"},
                        {"id": "maj-2", "name": "Sistem Informasi"}
                    ]
                },
                {
                    "id": "fak-2",
                    "name": "Fakultas Ekonomi dan Bisnis",
                    "majors": [{"id": "maj-3", "name": "Akuntansi"}]
                },
                {"id": "fak-3", "name": "Fakultas Hukum", "majors": null}
            ],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
    }

    #[test]
    fn test_counts_by_traversal() {
        let university = sample();
        assert_eq!(university.faculty_count(), 3);
        assert_eq!(university.major_count(), 3);

        let item = university.to_list_item();
        assert_eq!(item.faculty_count, 3);
        assert_eq!(item.major_count, 3);
    }

    #[test]
    fn test_find_major_requires_containment() {
        let university = sample();
        let (faculty, major) = university.find_major("fak-1", "maj-2").unwrap();
        assert_eq!(faculty.name, "Fakultas Ilmu Komputer");
        assert_eq!(major.name, "Sistem Informasi");
        assert!(university.find_major("fak-2", "maj-1").is_none());
        assert!(university.find_faculty("fak-9").is_none());
    }

    #[test]
    fn test_list_item_parses_string_counts() {
        let items: Vec<UniversityListItem> = Vec::from_json(&json!([
            {"id": "a", "name": "Institut Teknologi Bandung", "faculty_count": "12", "major_count": 40},
            {"id": "b", "name": "Universitas Gadjah Mada", "faculty_count": -1}
        ]));
        assert_eq!(items[0].faculty_count, 12);
        assert_eq!(items[1].faculty_count, 0);

        let found = search_universities(&items, "  gadjah ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
        assert_eq!(search_universities(&items, "").len(), 2);
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = UniversityCreate {
            name: "Universitas Airlangga".to_string(),
            faculties: vec![FacultyCreate {
                name: "Fakultas Kedokteran".to_string(),
                majors: vec![MajorCreate {
                    name: "Pendidikan Dokter".to_string(),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Universitas Airlangga",
                "faculties": [{
                    "name": "Fakultas Kedokteran",
                    "majors": [{"name": "Pendidikan Dokter"}]
                }]
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let university = sample();
        let again = University::from_json(&serde_json::to_value(&university).unwrap());
        assert_eq!(again, university);
    }
}
